//! Line-oriented terminal front end.
//!
//! Parses one command per line and drives a single session against the
//! generation workflow. Commands run one at a time; a generate command is
//! awaited to completion before the next line is read.

use crate::sampler::PromptSampler;
use crate::session::Session;
use crate::workflow::GenerationWorkflow;
use crate::Result;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "Commands:
  prompt <text>       set the image description
  negative [<text>]   set (or clear) what you don't want in the image
  random              fill the description with a random prompt
  generate [<text>]   generate an image (optionally with a new description)
  history             list recent images (newest first)
  regen <n>           reuse the description of history image n
  download <n>        save history image n as PNG
  clear               clear the history
  examples            list example prompts
  example <n>         use example prompt n as the description
  model               show the current model
  help                show this help
  quit                exit

Tips for better results:
  - Be specific and descriptive
  - Include style keywords (e.g. \"digital art\", \"photorealistic\", \"oil painting\")
  - Mention lighting, colors, and mood
  - Describe the composition";

pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "A futuristic city at night with neon lights, cyberpunk style",
    "A cute corgi wearing a space suit, floating in space, digital art",
    "A peaceful Japanese garden with cherry blossoms, watercolor painting",
    "A majestic dragon flying over mountains at sunset, fantasy art",
    "An astronaut riding a horse on Mars, photorealistic",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Negative(Option<String>),
    Random,
    Generate(Option<String>),
    History,
    /// 1-based gallery position.
    Regenerate(usize),
    /// 1-based gallery position.
    Download(usize),
    Clear,
    Examples,
    /// 1-based position in [`EXAMPLE_PROMPTS`].
    Example(usize),
    Model,
    Help,
    Quit,
}

fn parse_position(arg: &str, usage: &str) -> std::result::Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Usage: {} (n is a history position, starting at 1)", usage)),
    }
}

fn parse_example(arg: &str) -> std::result::Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if (1..=EXAMPLE_PROMPTS.len()).contains(&n) => Ok(n),
        _ => Err(format!(
            "Usage: example <n> (n is between 1 and {}, see `examples`)",
            EXAMPLE_PROMPTS.len()
        )),
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let text = (!rest.is_empty()).then(|| rest.to_string());

        match name.to_lowercase().as_str() {
            "prompt" => text
                .map(Command::Prompt)
                .ok_or_else(|| "Usage: prompt <text>".to_string()),
            "negative" => Ok(Command::Negative(text)),
            "random" => Ok(Command::Random),
            "generate" | "gen" => Ok(Command::Generate(text)),
            "history" | "ls" => Ok(Command::History),
            "regen" | "regenerate" => parse_position(rest, "regen <n>").map(Command::Regenerate),
            "download" | "save" => parse_position(rest, "download <n>").map(Command::Download),
            "clear" => Ok(Command::Clear),
            "examples" => Ok(Command::Examples),
            "example" => parse_example(rest).map(Command::Example),
            "model" => Ok(Command::Model),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("Type `help` for a list of commands".to_string()),
            other => Err(format!(
                "Unknown command '{}'. Type `help` for a list of commands",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    workflow: GenerationWorkflow,
    sampler: PromptSampler,
    session: Session,
    negative_prompt: Option<String>,
    download_dir: PathBuf,
}

impl Shell {
    pub fn new(workflow: GenerationWorkflow, sampler: PromptSampler, download_dir: PathBuf) -> Self {
        Self {
            workflow,
            sampler,
            session: Session::new(),
            negative_prompt: None,
            download_dir,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Parse and run one input line. Parse errors are printed, not returned.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command, out).await,
            Err(usage) => {
                writeln!(out, "{}", usage)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Prompt(text) => {
                self.session.set_prompt_text(text);
                writeln!(out, "Prompt: {}", self.session.prompt_text())?;
            }
            Command::Negative(text) => {
                match &text {
                    Some(text) => writeln!(out, "Negative prompt: {}", text)?,
                    None => writeln!(out, "Negative prompt cleared")?,
                }
                self.negative_prompt = text;
            }
            Command::Random => {
                let prompt = self.session.randomize_prompt(&self.sampler);
                writeln!(out, "Prompt: {}", prompt)?;
            }
            Command::Generate(text) => {
                if let Some(text) = text {
                    self.session.set_prompt_text(text);
                }
                self.generate(out).await?;
            }
            Command::History => self.render_history(out)?,
            Command::Regenerate(position) => match self.session.regenerate_from(position - 1) {
                Ok(prompt) => writeln!(
                    out,
                    "Prompt: {}\nRun `generate` to create a new image from it.",
                    prompt
                )?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Download(position) => self.download(position - 1, out).await?,
            Command::Clear => {
                self.session.clear_history();
                writeln!(out, "History cleared")?;
            }
            Command::Examples => {
                writeln!(out, "Example prompts:")?;
                for (position, example) in EXAMPLE_PROMPTS.iter().enumerate() {
                    writeln!(out, "[{}] {}", position + 1, example)?;
                }
            }
            Command::Example(position) => {
                self.session
                    .set_prompt_text(EXAMPLE_PROMPTS[position - 1].to_string());
                writeln!(out, "Prompt: {}", self.session.prompt_text())?;
            }
            Command::Model => writeln!(out, "Current model: {}", self.workflow.model())?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn generate<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let prompt = self.session.prompt_text().to_string();
        if !prompt.trim().is_empty() {
            writeln!(
                out,
                "Creating your masterpiece... This may take 10-30 seconds..."
            )?;
            out.flush()?;
        }

        match self
            .workflow
            .generate(&mut self.session, &prompt, self.negative_prompt.as_deref())
            .await
        {
            Ok(generation) => {
                if let Some(notice) = generation.notice {
                    writeln!(out, "{}", notice)?;
                }
                writeln!(
                    out,
                    "Image generated successfully! ({} bytes, {})",
                    generation.record.image().len(),
                    generation.record.caption_time()
                )?;
                writeln!(out, "Run `download 1` to save it.")?;
            }
            Err(e) => {
                writeln!(out, "Failed to generate image")?;
                writeln!(out, "{}", e)?;
                if e.is_retryable() {
                    writeln!(out, "Run `generate` again after a short wait.")?;
                }
            }
        }
        Ok(())
    }

    fn render_history<W: Write>(&self, out: &mut W) -> Result<()> {
        let history = self.session.history();
        if history.is_empty() {
            writeln!(out, "No images generated yet. Create your first image with `generate`!")?;
            return Ok(());
        }

        writeln!(
            out,
            "{} image(s) in history (max {})",
            history.size(),
            history.capacity()
        )?;
        for (position, record) in history.iter().enumerate() {
            writeln!(
                out,
                "[{}] {}  {}",
                position + 1,
                record.caption_time(),
                record.prompt()
            )?;
            if let Some(negative) = record.negative_prompt() {
                writeln!(out, "    Negative: {}", negative)?;
            }
        }
        Ok(())
    }

    async fn download<W: Write>(&self, index: usize, out: &mut W) -> Result<()> {
        let artifact = match self.session.download(index).await {
            Ok(artifact) => artifact,
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(());
            }
        };

        match artifact.save_in(&self.download_dir).await {
            Ok(path) => writeln!(out, "Saved {}", path.display())?,
            Err(e) => writeln!(out, "Download failed: {}", e)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockImageGenerationClient, ServiceFailure};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn build_shell(client: &MockImageGenerationClient, download_dir: PathBuf) -> Shell {
        Shell::new(
            GenerationWorkflow::new(Box::new(client.clone())),
            PromptSampler::builtin().unwrap(),
            download_dir,
        )
    }

    async fn run(shell: &mut Shell, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = shell.handle_line(line, &mut out).await.unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "prompt a cat on a mat".parse::<Command>().unwrap(),
            Command::Prompt("a cat on a mat".to_string())
        );
        assert_eq!(
            "negative".parse::<Command>().unwrap(),
            Command::Negative(None)
        );
        assert_eq!(
            "NEGATIVE  blurry, low quality ".parse::<Command>().unwrap(),
            Command::Negative(Some("blurry, low quality".to_string()))
        );
        assert_eq!("generate".parse::<Command>().unwrap(), Command::Generate(None));
        assert_eq!("regen 3".parse::<Command>().unwrap(), Command::Regenerate(3));
        assert_eq!("download 1".parse::<Command>().unwrap(), Command::Download(1));
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("examples".parse::<Command>().unwrap(), Command::Examples);
        assert_eq!("example 5".parse::<Command>().unwrap(), Command::Example(5));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("prompt".parse::<Command>().is_err());
        assert!("regen 0".parse::<Command>().is_err());
        assert!("download x".parse::<Command>().is_err());
        assert!("example".parse::<Command>().is_err());
        assert!("example 0".parse::<Command>().is_err());
        assert!("example 6".parse::<Command>().unwrap_err().contains("between 1 and 5"));
        assert!("dance".parse::<Command>().unwrap_err().contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_generate_then_history_and_download() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        run(&mut shell, "negative blurry").await;
        let (_, output) = run(&mut shell, "generate a red fox").await;
        assert!(output.contains("Image generated successfully!"));

        let (_, output) = run(&mut shell, "history").await;
        assert!(output.contains("1 image(s) in history (max 10)"));
        assert!(output.contains("a red fox"));
        assert!(output.contains("Negative: blurry"));

        let (_, output) = run(&mut shell, "download 1").await;
        assert!(output.contains("Saved"));
        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_failure_prints_classified_message() {
        let client = MockImageGenerationClient::new().with_failure(ServiceFailure::Loading);
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        let (flow, output) = run(&mut shell, "generate a cat").await;
        assert_eq!(flow, Flow::Continue);
        assert!(output.contains("Failed to generate image"));
        assert!(output.contains("Model Loading"));
        assert!(shell.session().history().is_empty());
    }

    #[tokio::test]
    async fn test_generate_with_empty_prompt_warns() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        let (_, output) = run(&mut shell, "generate").await;
        assert!(output.contains("Please enter a description"));
        assert_eq!(client.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_regen_reseeds_prompt() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        run(&mut shell, "generate first idea").await;
        run(&mut shell, "generate second idea").await;

        let (_, output) = run(&mut shell, "regen 2").await;
        assert!(output.contains("Prompt: first idea"));
        assert_eq!(shell.session().prompt_text(), "first idea");

        let (_, output) = run(&mut shell, "regen 5").await;
        assert!(output.contains("out of range"));
    }

    #[tokio::test]
    async fn test_random_then_clear_and_quit() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        let (_, output) = run(&mut shell, "random").await;
        assert!(output.starts_with("Prompt: "));
        assert!(!shell.session().prompt_text().is_empty());

        run(&mut shell, "generate").await;
        run(&mut shell, "clear").await;
        let (_, output) = run(&mut shell, "history").await;
        assert!(output.contains("No images generated yet"));

        let (flow, _) = run(&mut shell, "quit").await;
        assert_eq!(flow, Flow::Quit);
    }

    #[tokio::test]
    async fn test_example_prompt_seeds_generation() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        let (_, output) = run(&mut shell, "examples").await;
        assert!(output.contains("[1] A futuristic city at night with neon lights, cyberpunk style"));
        assert!(output.contains("[5] An astronaut riding a horse on Mars, photorealistic"));

        let (_, output) = run(&mut shell, "example 2").await;
        assert_eq!(
            output,
            "Prompt: A cute corgi wearing a space suit, floating in space, digital art\n"
        );

        run(&mut shell, "generate").await;
        assert_eq!(
            client.get_requests()[0].prompt,
            "A cute corgi wearing a space suit, floating in space, digital art"
        );
        assert_eq!(shell.session().history().size(), 1);
    }

    #[tokio::test]
    async fn test_help_lists_tips() {
        let client = MockImageGenerationClient::new();
        let dir = tempdir().unwrap();
        let mut shell = build_shell(&client, dir.path().to_path_buf());

        let (_, output) = run(&mut shell, "help").await;
        assert!(output.contains("Tips for better results:"));
        assert!(output.contains("Mention lighting, colors, and mood"));
        assert!(output.contains("example <n>"));
    }
}
