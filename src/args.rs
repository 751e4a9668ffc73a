//! Command-line argument definition.

use clap::Parser;

/// pkghist - interactively explore the release history of an npm package
#[derive(Parser, Debug)]
#[command(name = "pkghist")]
#[command(version)]
#[command(about = "Interactively explore the release history of an npm package", long_about = None)]
pub struct Args {
    /// Package to explore (e.g. `@acme/cli`)
    pub package: String,

    /// Registry to query
    #[arg(long, default_value = "https://registry.npmjs.org")]
    pub registry: String,

    /// Scope used to shorten plugin names (defaults to the package's own scope)
    #[arg(long)]
    pub scope: Option<String>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The scope to strip from plugin dependency names: the explicit
    /// `--scope` flag, or the scope of the package itself when it has one.
    pub fn effective_scope(&self) -> Option<String> {
        if self.scope.is_some() {
            return self.scope.clone();
        }
        self.package
            .strip_prefix('@')
            .and_then(|rest| rest.split_once('/'))
            .map(|(scope, _)| scope.to_string())
    }
}
