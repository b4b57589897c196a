use clap::{Parser, Subcommand};
use recipe_press::{config, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    if env!("RECIPE_PRESS_RELEASE") == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("RECIPE_PRESS_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "recipe-press")]
#[command(about = "Static site generator for recipe collections")]
#[command(long_about = "\
Static site generator for recipe collections

Each data file becomes one page, rendered through Handlebars templates.
The output directory is wiped and regenerated on every build.

Project structure:

  site/
  ├── site.toml                    # Optional config (see gen-config)
  ├── data/recipes/
  │   ├── banana-bread.json        # {\"slug\": \"banana-bread\", \"headline\": \"Banana Bread\", ...}
  │   └── shakshuka.toml           # TOML records work too
  ├── templates/
  │   ├── layout.hbs               # Page shell: pageTitle, body, recipes
  │   ├── recipe.hbs               # One recipe
  │   ├── index.hbs                # Landing page content
  │   └── partials/                # Optional {{> name}} partials
  ├── static/                      # style.css, favicon.ico, CNAME, robots.txt, ...
  └── images/                      # Copied to dist/images/

Pages are ordered by headline. A record's own pageTitle wins over
[defaults]; index.html always uses listing_title.

Run 'recipe-press gen-config' to print a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root (where site.toml, data/ and templates/ live)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory, overriding output_dir from site.toml
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clear the output directory and generate the site
    Build,
    /// Compile templates and load recipes without writing anything
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build => {
            let site_config = load_config(&cli)?;
            let (tx, rx) = std::sync::mpsc::channel::<generate::BuildEvent>();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    let warn = event.is_warning();
                    for line in output::format_build_event(&event) {
                        if warn {
                            eprintln!("{}", line);
                        } else {
                            println!("{}", line);
                        }
                    }
                }
            });
            let result = generate::build(&cli.root, &site_config, Some(tx));
            // The sender is gone once build returns, so the printer drains and exits.
            printer.join().ok();
            result?;
        }
        Command::Check => {
            let site_config = load_config(&cli)?;
            println!("==> Checking {}", cli.root.display());
            let records = generate::check(&cli.root, &site_config)?;
            output::print_check_output(&records);
            println!("==> Templates and recipes are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

/// Load `site.toml` and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(&cli.root)?;
    if let Some(output_dir) = &cli.output {
        // Relative to the working directory, not the project root.
        let output_dir = std::path::absolute(output_dir)?;
        site_config.output_dir = output_dir.to_string_lossy().into_owned();
    }
    site_config.validate()?;
    log::debug!("resolved config: {site_config:?}");
    Ok(site_config)
}
