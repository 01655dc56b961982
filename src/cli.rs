// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::ai::{apply_tweaks, Enhancer, RefineMode};
use crate::app_log;
use crate::core::{ConfigManager, Database, FsOps, LlmClient, TemplateEngine};
use crate::export::{ExportFormat, ExportJob};
use crate::job_source::JobSource;
use crate::render::{Customization, Tone};
use crate::storage::{mask_api_key, SavedCvRepository, SettingsRepository, UsageTracker};
use crate::types::{CvForm, CvRecord};
use crate::validation::validate_form;

#[derive(Parser)]
#[command(name = "cvcraft")]
#[command(about = "Build, tailor and export CVs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the local HTTP API
    Serve {
        #[arg(long, env = "ROCKET_PORT", default_value_t = 8000)]
        port: u16,
    },
    /// List available templates
    Templates,
    /// Check a form file for missing fields
    Validate { form: PathBuf },
    /// Build a CV record from a form without AI
    Build {
        form: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a polished CV record from a form with AI
    Generate {
        form: PathBuf,
        #[arg(long)]
        template: Option<String>,
        #[arg(long, default_value = "formal")]
        tone: Tone,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a record to an HTML preview
    Render {
        record: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a record as html, json, markdown, pdf, png or docx
    Export {
        record: PathBuf,
        #[arg(long, value_enum)]
        format: ExportFormat,
        #[command(flatten)]
        style: StyleArgs,
        /// Output directory (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite a piece of text three ways
    Refine {
        #[arg(long)]
        text: String,
        #[arg(long)]
        instructions: String,
        /// Target job description; switches to job mode
        #[arg(long)]
        job: Option<String>,
    },
    /// Suggest changes that match a record to a job posting
    Tweak {
        record: PathBuf,
        /// Job description text or posting URL
        #[arg(long)]
        job: String,
        /// Apply every suggestion and write the record back
        #[arg(long)]
        apply: bool,
    },
    /// Manage saved CV data
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
    /// Manage the model API key
    ApiKey {
        #[command(subcommand)]
        command: ApiKeyCommand,
    },
    /// Show or top up today's generation credits
    Credits {
        #[command(subcommand)]
        command: CreditsCommand,
    },
    /// Record the account email
    Signup { email: String },
}

#[derive(Subcommand)]
pub enum SavedCommand {
    /// List saved entries, newest first
    List,
    /// Save a form file under a name
    Save {
        form: PathBuf,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Print one entry's form as JSON
    Show { id: Uuid },
    /// Delete one entry
    Delete { id: Uuid },
    /// Write one entry to a cv-data JSON file
    Export {
        id: Uuid,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import an exported cv-data JSON file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum ApiKeyCommand {
    Set { key: String },
    Show,
    Delete,
}

#[derive(Subcommand)]
pub enum CreditsCommand {
    Show,
    Redeem { code: String },
}

/// Template and customization flags shared by render and export.
#[derive(Args)]
pub struct StyleArgs {
    #[arg(long)]
    pub template: Option<String>,
    #[arg(long)]
    pub color_preset: Option<String>,
    #[arg(long)]
    pub accent: Option<String>,
    #[arg(long)]
    pub background: Option<String>,
    #[arg(long)]
    pub text_color: Option<String>,
    #[arg(long)]
    pub font: Option<String>,
    /// Profile photo: a URL for HTML, a local PNG/JPEG for PDF and PNG
    #[arg(long)]
    pub photo: Option<String>,
}

impl StyleArgs {
    pub fn customization(&self) -> Customization {
        Customization {
            color_preset: self.color_preset.clone(),
            accent_color: self.accent.clone(),
            background_color: self.background.clone(),
            text_color: self.text_color.clone(),
            font_family: self.font.clone(),
            ..Default::default()
        }
    }
}

/// Load `path`, or `./config.yaml` when absent. Relative paths inside the file
/// resolve against the directory holding it.
pub fn load_config(path: Option<&Path>) -> Result<ConfigManager> {
    let Some(path) = path else {
        return ConfigManager::load();
    };

    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("Failed to get current directory")?,
    };
    ConfigManager::load_from(path, &base)
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port } => crate::web::start_web_server(config, port).await,
        Command::Templates => list_templates(&config),
        Command::Validate { form } => validate(&form).await,
        Command::Build { form, output } => {
            let form: CvForm = FsOps::read_json(&form).await?;
            let record = CvRecord::from_form(&form);
            emit_json(&record, output.as_deref()).await
        }
        Command::Generate {
            form,
            template,
            tone,
            output,
        } => generate(&config, &form, template.as_deref(), tone, output.as_deref()).await,
        Command::Render {
            record,
            style,
            output,
        } => render(&config, &record, &style, output.as_deref()).await,
        Command::Export {
            record,
            format,
            style,
            output,
        } => export(&config, &record, format, &style, output).await,
        Command::Refine {
            text,
            instructions,
            job,
        } => refine(&config, &text, &instructions, job.as_deref()).await,
        Command::Tweak { record, job, apply } => tweak(&config, &record, &job, apply).await,
        Command::Saved { command } => saved(&config, command).await,
        Command::ApiKey { command } => api_key(&config, command).await,
        Command::Credits { command } => credits(&config, command).await,
        Command::Signup { email } => {
            if !email.contains('@') {
                anyhow::bail!("Please enter a valid email address");
            }
            let db = open_database(&config).await?;
            SettingsRepository::new(db.pool()).sign_up(&email).await?;
            UsageTracker::new(db.pool(), config.usage.generations_per_day)
                .reset(UsageTracker::today())
                .await?;
            println!("Signed up as {}", email.trim());
            Ok(())
        }
    }
}

async fn open_database(config: &ConfigManager) -> Result<Database> {
    Database::new(&config.environment.database_path).await
}

fn template_engine(config: &ConfigManager) -> Result<TemplateEngine> {
    TemplateEngine::new(config.environment.templates_path.clone())
}

async fn enhancer(config: &ConfigManager, db: &Database) -> Result<Enhancer> {
    let key = SettingsRepository::new(db.pool())
        .api_key()
        .await?
        .or_else(|| config.llm.api_key.clone())
        .unwrap_or_default();
    let client = LlmClient::new(&config.llm, &key)
        .context("Save a key with `cvcraft api-key set <key>` or set GEMINI_API_KEY")?;
    Ok(Enhancer::new(client))
}

/// Pretty JSON to a file, or to stdout.
async fn emit_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            FsOps::write_json(path, value).await?;
            println!("Written {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn list_templates(config: &ConfigManager) -> Result<()> {
    let engine = template_engine(config)?;
    for template in engine.list_templates() {
        let origin = if template.builtin { "" } else { " (custom)" };
        println!("{:<28} {}{}", template.id, template.description, origin);
    }
    Ok(())
}

async fn validate(form: &Path) -> Result<()> {
    let form: CvForm = FsOps::read_json(form).await?;
    match validate_form(&form) {
        Ok(()) => {
            println!("Form is complete");
            Ok(())
        }
        Err(errors) => {
            for issue in &errors.issues {
                println!("{:<24} {}", issue.field, issue.message);
            }
            anyhow::bail!("{} fields need attention", errors.issues.len())
        }
    }
}

async fn generate(
    config: &ConfigManager,
    form: &Path,
    template: Option<&str>,
    tone: Tone,
    output: Option<&Path>,
) -> Result<()> {
    let form: CvForm = FsOps::read_json(form).await?;
    let engine = template_engine(config)?;
    let template = engine.resolve(template)?;

    let db = open_database(config).await?;
    let enhancer = enhancer(config, &db).await?;
    let usage = UsageTracker::new(db.pool(), config.usage.generations_per_day);

    let record = enhancer.generate(&form, template, tone, &usage).await?;
    emit_json(&record, output).await
}

async fn render(
    config: &ConfigManager,
    record: &Path,
    style: &StyleArgs,
    output: Option<&Path>,
) -> Result<()> {
    let record: CvRecord = FsOps::read_json(record).await?;
    let engine = template_engine(config)?;
    let customization = style.customization();

    let job = ExportJob {
        record: &record,
        template: engine.resolve(style.template.as_deref())?,
        customization: &customization,
        photo: style.photo.as_deref(),
    };
    let html = job.html();

    match output {
        Some(path) => {
            FsOps::write_file_safe(path, &html).await?;
            println!("Written {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

async fn export(
    config: &ConfigManager,
    record: &Path,
    format: ExportFormat,
    style: &StyleArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let record: CvRecord = FsOps::read_json(record).await?;
    let engine = template_engine(config)?;
    let customization = style.customization();

    let job = ExportJob {
        record: &record,
        template: engine.resolve(style.template.as_deref())?,
        customization: &customization,
        photo: style.photo.as_deref(),
    };

    let file = job.export(format).await?;
    let dir = output.unwrap_or_else(|| config.environment.output_path.clone());
    let path = file.write_to(&dir).await?;
    println!("Written {}", path.display());
    Ok(())
}

async fn refine(
    config: &ConfigManager,
    text: &str,
    instructions: &str,
    job: Option<&str>,
) -> Result<()> {
    let db = open_database(config).await?;
    let enhancer = enhancer(config, &db).await?;
    let mode = if job.is_some() {
        RefineMode::Job
    } else {
        RefineMode::Custom
    };

    let versions = enhancer.refine(text, instructions, mode, job).await?;
    for version in versions {
        println!("--- Version {} ---\n{}\n", version.version, version.text);
    }
    Ok(())
}

async fn tweak(config: &ConfigManager, record_path: &Path, job: &str, apply: bool) -> Result<()> {
    let mut record: CvRecord = FsOps::read_json(record_path).await?;

    let job = JobSource::new(config.llm.timeout_seconds)?.resolve(job).await?;
    let db = open_database(config).await?;
    let tweaks = enhancer(config, &db).await?.tweak(&record, &job).await?;

    if tweaks.is_empty() {
        println!("No changes suggested");
        return Ok(());
    }

    for tweak in &tweaks {
        println!(
            "[{}]\n- {}\n+ {}\n",
            tweak.field,
            tweak.original.replace('\n', "\n- "),
            tweak.tweaked.replace('\n', "\n+ ")
        );
    }

    if apply {
        let selected: Vec<String> = tweaks.iter().map(|t| t.field.clone()).collect();
        let outcome = apply_tweaks(&mut record, &tweaks, &selected);
        FsOps::write_json(record_path, &record).await?;
        app_log!(info, "Applied {} tweaks to {}", outcome.applied, record_path.display());
        println!("Applied {} changes to {}", outcome.applied, record_path.display());
    }
    Ok(())
}

async fn saved(config: &ConfigManager, command: SavedCommand) -> Result<()> {
    let db = open_database(config).await?;
    let repo = SavedCvRepository::new(db.pool());

    match command {
        SavedCommand::List => {
            let entries = repo.list().await?;
            if entries.is_empty() {
                println!("No saved CVs");
            }
            for saved in entries {
                println!(
                    "{}  {}  {}",
                    saved.id,
                    saved.saved_at.format("%Y-%m-%d %H:%M"),
                    saved.name
                );
            }
        }
        SavedCommand::Save { form, name } => {
            let form: CvForm = FsOps::read_json(&form).await?;
            let saved = repo.save(&name, &form).await?;
            println!("Saved '{}' as {}", saved.name, saved.id);
        }
        SavedCommand::Show { id } => {
            let saved = repo
                .get(id)
                .await?
                .with_context(|| format!("Saved CV {} not found", id))?;
            println!("{}", serde_json::to_string_pretty(&saved.form)?);
        }
        SavedCommand::Delete { id } => {
            if !repo.delete(id).await? {
                anyhow::bail!("Saved CV {} not found", id);
            }
            println!("Deleted {}", id);
        }
        SavedCommand::Export { id, output } => {
            let saved = repo
                .get(id)
                .await?
                .with_context(|| format!("Saved CV {} not found", id))?;
            let dir = output.unwrap_or_else(|| config.environment.output_path.clone());
            let path = dir.join(saved.export_filename());
            FsOps::write_json(&path, &saved).await?;
            println!("Written {}", path.display());
        }
        SavedCommand::Import { file } => {
            let json = FsOps::read_file_safe(&file).await?;
            let saved = repo.import_json(&json).await?;
            println!("Imported '{}' as {}", saved.name, saved.id);
        }
    }
    Ok(())
}

async fn api_key(config: &ConfigManager, command: ApiKeyCommand) -> Result<()> {
    let db = open_database(config).await?;
    let settings = SettingsRepository::new(db.pool());

    match command {
        ApiKeyCommand::Set { key } => {
            settings.save_api_key(&key).await?;
            println!("API key saved ({})", mask_api_key(key.trim()));
        }
        ApiKeyCommand::Show => match settings.api_key().await? {
            Some(key) => println!("{}", mask_api_key(&key)),
            None if config.llm.api_key.is_some() => println!("Using GEMINI_API_KEY from the environment"),
            None => println!("No API key configured"),
        },
        ApiKeyCommand::Delete => {
            if settings.delete_api_key().await? {
                println!("API key removed");
            } else {
                println!("No API key was saved");
            }
        }
    }
    Ok(())
}

async fn credits(config: &ConfigManager, command: CreditsCommand) -> Result<()> {
    let db = open_database(config).await?;
    let tracker = UsageTracker::new(db.pool(), config.usage.generations_per_day);
    let today = UsageTracker::today();

    let status = match command {
        CreditsCommand::Show => tracker.status(today).await?,
        CreditsCommand::Redeem { code } => tracker.redeem(&code, today).await?,
    };
    println!(
        "{} of {} generations left today ({} used)",
        status.remaining, status.per_day, status.used
    );
    Ok(())
}
