use clap::{Args, Parser, Subcommand};
use slipgen::config::{SlipConfig, CONFIG_FILENAME};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slipgen", bin_name = "slipgen", version)]
#[command(
    about = "Generate salary slips from spreadsheet rows and a Word template",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file
    #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one slip per row (the default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Write a default config and a starter template
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., sheet-id)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Per-run overrides of the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Spreadsheet key
    #[arg(long)]
    pub sheet_id: Option<String>,

    /// Tab to read
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Service-account key file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Template document (.docx)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory for the generated slips
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Read rows from a CSV file instead of the spreadsheet
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Office binary used for PDF conversion
    #[arg(long)]
    pub converter: Option<PathBuf>,

    /// Only write .docx files
    #[arg(long)]
    pub no_pdf: bool,
}

impl GenerateArgs {
    pub fn apply(&self, config: &mut SlipConfig) {
        if let Some(id) = &self.sheet_id {
            config.sheet_id = id.clone();
        }
        if let Some(name) = &self.sheet_name {
            config.sheet_name = name.clone();
        }
        if let Some(path) = &self.credentials {
            config.credentials_path = path.clone();
        }
        if let Some(path) = &self.template {
            config.template_path = path.clone();
        }
        if let Some(path) = &self.output_dir {
            config.output_dir = path.clone();
        }
        if let Some(path) = &self.csv {
            config.csv_path = Some(path.clone());
        }
        if let Some(path) = &self.converter {
            config.converter = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["slipgen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("slipgen.json"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_generate_flags_override_config() {
        let cli = Cli::try_parse_from([
            "slipgen",
            "generate",
            "--csv",
            "rows.csv",
            "--template",
            "t.docx",
            "-o",
            "out",
            "--no-pdf",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.no_pdf);

        let mut config = SlipConfig::default();
        args.apply(&mut config);
        assert_eq!(config.csv_path, Some(PathBuf::from("rows.csv")));
        assert_eq!(config.template_path, PathBuf::from("t.docx"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.sheet_name, "Sheet1");
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["slipgen", "init", "--force", "--config", "x.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.json"));
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_config_key_value() {
        let cli = Cli::try_parse_from(["slipgen", "config", "sheet-id", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Config { key, value }) => {
                assert_eq!(key.as_deref(), Some("sheet-id"));
                assert_eq!(value.as_deref(), Some("abc"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
