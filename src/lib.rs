//! inkpost: a small static site generator for markdown blogs
//!
//! A build loads every document under the input directory, gathers the
//! dated `posts` collection, copies passthrough assets, and renders each
//! page through Tera layouts with the `md` and `toDate` filters.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Input (source) directory
    pub input_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Layout directory inside the input directory
    pub includes_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let input_dir = base_dir.join(&config.input_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let includes_dir = input_dir.join(&config.includes_dir);

        Self {
            config,
            base_dir,
            input_dir,
            output_dir,
            includes_dir,
        }
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Build the site
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self, false)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::run(self, title, None)
    }
}
