// ABOUTME: Main entry point for the cardpost program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use cardpost::{
    ChromeRasterizer, ClipboardCommand, CommandClipboard, Config, EditField, Exporter,
    ImageFormat, MarkdownOptions, PageShell, PreviewSession, RasterOptions, RebuildOutcome,
    SettingField, Settings, SettingsStore, StyleConfig, WatchConfig, copy_current, resources,
    utils,
};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a note into a preview HTML page
    Preview(PreviewArgs),

    /// Export one card as an image
    Export(ExportArgs),

    /// Export every card of each matching note into a zip archive
    ExportAll(ExportAllArgs),

    /// Copy one card image to the clipboard
    Copy(CopyArgs),

    /// Watch a note and keep its preview up to date
    Watch(WatchArgs),

    /// List available themes and templates
    Themes(SettingsArgs),

    /// Change a stored setting
    Edit(EditArgs),
}

#[derive(Args)]
struct SettingsArgs {
    /// Settings file (defaults to CARDPOST_SETTINGS or ~/.config/cardpost/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args)]
struct StyleArgs {
    /// Theme id for this run
    #[arg(long)]
    theme: Option<String>,

    /// Template id for this run
    #[arg(long)]
    template: Option<String>,

    /// Body font size in pixels (12-30)
    #[arg(long)]
    font_size: Option<u32>,

    /// Font family for this run
    #[arg(long)]
    font_family: Option<String>,

    /// Extra CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// Mode for CSS: 'embed' to embed content or 'link' to reference remote sheets
    #[arg(long, default_value = "embed")]
    mode: String,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Args)]
struct RasterArgs {
    /// Pixel ratio of exported images
    #[arg(long)]
    scale: Option<f64>,

    /// Card width in CSS pixels
    #[arg(long)]
    width: Option<u32>,

    /// Browser timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args)]
struct PreviewArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Card to show, starting at 1
    #[arg(long)]
    page: Option<usize>,

    /// Leave out the previous/next controls
    #[arg(long)]
    no_nav: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct ExportArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Output image path (.png or .jpg)
    #[arg(short, long)]
    output: PathBuf,

    /// Card to export, starting at 1
    #[arg(long)]
    page: Option<usize>,

    #[command(flatten)]
    raster: RasterArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct ExportAllArgs {
    /// Markdown file or glob pattern
    #[arg(short, long)]
    input: String,

    /// Directory for the zip archives
    #[arg(short, long)]
    output: PathBuf,

    /// Image format inside the archives
    #[arg(long, default_value = "png")]
    format: String,

    #[command(flatten)]
    raster: RasterArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct CopyArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Card to copy, starting at 1
    #[arg(long)]
    page: Option<usize>,

    /// Clipboard command to pipe the image into instead of wl-copy/xclip
    #[arg(long)]
    command: Option<String>,

    #[command(flatten)]
    raster: RasterArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct WatchArgs {
    /// Path to the markdown file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Serve the preview on a local web server
    #[arg(long)]
    serve: bool,

    /// Port for the preview server
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Debounce time for file changes in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct EditArgs {
    /// Field to change (user-name, user-id, user-avatar, footer-left, footer-right,
    /// theme, template, font-family, font-size, show-time, time-format,
    /// background, background-scale, background-position)
    #[arg(long)]
    field: String,

    /// New value; empty restores the default
    #[arg(long, default_value = "")]
    value: String,

    #[command(flatten)]
    settings: SettingsArgs,
}

fn load_settings(config: &Config, args: &SettingsArgs) -> cardpost::Result<Settings> {
    config.settings_store(args.settings.clone()).load()
}

/// Stored settings with this run's overrides applied (not saved)
fn resolve_style(config: &Config, args: &StyleArgs) -> anyhow::Result<(Settings, StyleConfig)> {
    let mut settings = load_settings(config, &args.settings)?;
    let overrides = [
        (SettingField::Theme, args.theme.clone()),
        (SettingField::Template, args.template.clone()),
        (SettingField::FontSize, args.font_size.map(|s| s.to_string())),
        (SettingField::FontFamily, args.font_family.clone()),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            settings.apply_edit(&EditField::new(field, value))?;
        }
    }
    let style = StyleConfig::resolve(&settings);
    Ok((settings, style))
}

fn page_shell(config: &Config, args: &StyleArgs, input: &Path) -> anyhow::Result<PageShell> {
    let embed = match args.mode.as_str() {
        "embed" => config.embed_resources,
        "link" => false,
        other => anyhow::bail!("Unknown CSS mode: {} (expected 'embed' or 'link')", other),
    };
    let css = args.css.clone().unwrap_or_default();
    Ok(PageShell {
        title: utils::file_prefix(input),
        width: config.default_width,
        base_href: utils::base_href_for(input),
        stylesheets: resources::stylesheet_tags(&css, embed)?,
        ..PageShell::default()
    })
}

/// Open a note in a fresh session and select the requested card
fn open_session(
    input: &Path,
    args: &StyleArgs,
    config: &Config,
    page: Option<usize>,
) -> anyhow::Result<PreviewSession> {
    let (settings, style) = resolve_style(config, args)?;
    let mut session = PreviewSession::new(style, settings.profile());
    let outcome = session.open_file(input, &MarkdownOptions::default())?;
    if let RebuildOutcome::Rebuilt { sections: 0, .. } = outcome {
        warn!("{}", cardpost::splitter::guidance_message());
    }
    if let Some(page) = page {
        let count = session.preview().section_count();
        if page == 0 || page > count {
            anyhow::bail!("Page {} is out of range, the note has {} cards", page, count);
        }
        session.go_to(page - 1);
    }
    Ok(session)
}

fn raster_options(config: &Config, args: &RasterArgs, format: ImageFormat) -> RasterOptions {
    config.get_raster_options(args.width, args.scale, Some(format), args.timeout_ms)
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().format_timestamp(None).try_init();
    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match &cli.command {
        Some(Commands::Preview(args)) => run_preview(args, &config),
        Some(Commands::Export(args)) => run_export(args, &config),
        Some(Commands::ExportAll(args)) => run_export_all(args, &config),
        Some(Commands::Copy(args)) => run_copy(args, &config),
        Some(Commands::Watch(args)) => run_watch(args, &config),
        Some(Commands::Themes(args)) => run_themes(args, &config),
        Some(Commands::Edit(args)) => run_edit(args, &config),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_preview(args: &PreviewArgs, config: &Config) -> anyhow::Result<()> {
    let session = open_session(&args.input, &args.style, config, args.page)?;
    let shell = page_shell(config, &args.style, &args.input)?;
    let html = session.to_html(&shell, !args.no_nav, false);
    cardpost::write_html_to_file(&html, &args.output)
        .with_context(|| format!("Failed to write preview to {:?}", args.output))?;
    println!(
        "Preview generated: {:?} ({} cards)",
        args.output,
        session.preview().section_count()
    );
    Ok(())
}

fn run_export(args: &ExportArgs, config: &Config) -> anyhow::Result<()> {
    let session = open_session(&args.input, &args.style, config, args.page)?;
    let shell = page_shell(config, &args.style, &args.input)?;
    let format = ImageFormat::from_path(&args.output);
    let rasterizer = ChromeRasterizer::new(config.browser_path.clone());
    let exporter = Exporter::new(&rasterizer, raster_options(config, &args.raster, format), shell)
        .with_prefix(&utils::file_prefix(&args.input));

    let image = exporter.export_current(session.preview())?;
    image.save(&args.output)?;
    println!("Card exported: {:?}", args.output);
    Ok(())
}

fn run_export_all(args: &ExportAllArgs, config: &Config) -> anyhow::Result<()> {
    let inputs = utils::resolve_inputs(&args.input)?;
    utils::validate_directory_writable(&args.output)?;
    let format: ImageFormat = args.format.parse()?;
    let rasterizer = ChromeRasterizer::new(config.browser_path.clone());

    let mut failures = 0;
    for input in &inputs {
        let exported = (|| -> anyhow::Result<PathBuf> {
            let mut session = open_session(input, &args.style, config, None)?;
            let shell = page_shell(config, &args.style, input)?;
            let exporter =
                Exporter::new(&rasterizer, raster_options(config, &args.raster, format), shell)
                    .with_prefix(&utils::file_prefix(input));
            let archive = exporter.export_all(session.preview_mut())?;
            Ok(archive.save_in(&args.output)?)
        })();

        match exported {
            Ok(path) => println!("Exported {:?} -> {:?}", input, path),
            Err(e) => {
                failures += 1;
                eprintln!("Failed to export {:?}: {:#}", input, e);
            }
        }
    }

    info!("Exported {} of {} notes", inputs.len() - failures, inputs.len());
    if failures > 0 {
        anyhow::bail!("{} of {} notes failed to export", failures, inputs.len());
    }
    Ok(())
}

fn run_copy(args: &CopyArgs, config: &Config) -> anyhow::Result<()> {
    let session = open_session(&args.input, &args.style, config, args.page)?;
    let shell = page_shell(config, &args.style, &args.input)?;
    let rasterizer = ChromeRasterizer::new(config.browser_path.clone());
    let exporter = Exporter::new(
        &rasterizer,
        raster_options(config, &args.raster, ImageFormat::Png),
        shell,
    );
    let clipboard = match &args.command {
        Some(command) => CommandClipboard::new(
            ClipboardCommand::custom(command)
                .ok_or_else(|| anyhow::anyhow!("Clipboard command is empty"))?,
        ),
        None => CommandClipboard::detect(),
    };

    copy_current(&exporter, session.preview(), &clipboard)?;
    println!("Card {} copied to clipboard", session.nav_state().indicator);
    Ok(())
}

fn run_watch(args: &WatchArgs, config: &Config) -> anyhow::Result<()> {
    let (settings, style) = resolve_style(config, &args.style)?;
    let session = PreviewSession::new(style, settings.profile());
    let shell = page_shell(config, &args.style, &args.input)?;
    let embed = args.style.mode != "link" && config.embed_resources;

    let watch_config = WatchConfig {
        markdown_path: args.input.clone(),
        html_output: args.output.clone(),
        stylesheets: args.style.css.clone().unwrap_or_default(),
        embed_resources: embed,
        debounce_ms: args.debounce_ms.unwrap_or(config.debounce_ms),
        serve: args.serve,
        port: args.port,
        ..WatchConfig::default()
    };

    cardpost::watch_markdown(watch_config, session, shell)?;
    Ok(())
}

fn run_themes(args: &SettingsArgs, config: &Config) -> anyhow::Result<()> {
    let settings = load_settings(config, args)?;
    println!("Themes:");
    for theme in settings.all_themes() {
        let marker = if theme.id == settings.theme_id { "*" } else { " " };
        let kind = if theme.is_preset { "preset" } else { "custom" };
        println!("{} {:<10} {:<10} ({}) {}", marker, theme.id, theme.name, kind, theme.description);
    }
    println!("Templates:");
    for template in cardpost::Template::builtin() {
        let marker = if template.id == settings.template_id { "*" } else { " " };
        println!("{} {:<10} {}", marker, template.id, template.name);
    }
    Ok(())
}

fn run_edit(args: &EditArgs, config: &Config) -> anyhow::Result<()> {
    let store = config.settings_store(args.settings.settings.clone());
    let mut settings = store.load()?;
    let field: SettingField = args.field.parse()?;
    settings.apply_edit(&EditField::new(field, args.value.clone()))?;
    store.save(&settings)?;
    println!("Updated {} in {:?}", args.field, store.path());
    Ok(())
}
