use crate::export::EdgePolicy;
use crate::Args;
use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_path: PathBuf,
    pub minimum_white: usize,
    pub edge: EdgePolicy,
    pub dry_run: bool,
    pub json: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input_file: args.input_file,
            output_path: args.output_path,
            minimum_white: args.minimum_white as usize,
            edge: args.edge,
            dry_run: args.dry_run,
            json: args.json,
        }
    }
}
