//! Command-line interface definitions for gem2site

use clap::Parser;
use std::path::PathBuf;

use crate::site_config::Overrides;

/// CLI structure for the gem2site application
#[derive(Parser, Debug)]
#[command(name = "gem2site")]
#[command(version)]
#[command(about = "Convert a tree of gemtext documents into a static HTML site", long_about = None)]
pub struct Cli {
    /// Source directory containing .gmi files
    #[arg(value_name = "SOURCE", required_unless_present = "dump")]
    pub source: Option<PathBuf>,

    /// Destination directory for the generated site
    #[arg(value_name = "DEST", required_unless_present = "dump")]
    pub dest: Option<PathBuf>,

    /// Path of an external template file
    #[arg(long, value_name = "PATH")]
    pub tmpl: Option<PathBuf>,

    /// Use an external stylesheet instead of the inlined default; the value
    /// is used as the href of a <link> element in the page head
    #[arg(long, value_name = "URL")]
    pub css: Option<String>,

    /// Code highlighting theme (default InspiredGitHub); pass an empty
    /// string to disable highlighting
    #[arg(long, value_name = "STYLE")]
    pub hl: Option<String>,

    /// Print the default template and stylesheet, then exit
    #[arg(long)]
    pub dump: bool,

    /// Site configuration file (gem2site.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given on the command line that override the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            template: self.tmpl.clone(),
            stylesheet: self.css.clone(),
            highlight_style: self.hl.clone(),
        }
    }
}
