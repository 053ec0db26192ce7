use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    author,
    about = "Generate entity source files from JSON database schemas",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(global = true, short, long, help = "Show debug messages")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, PartialEq, Eq, Debug)]
pub enum Commands {
    #[command(
        about = "Compile the schema file of each directory and write its entity files",
        arg_required_else_help = true
    )]
    Generate {
        #[arg(
            required = true,
            value_name = "DIR",
            help = "Directories holding a schema file; each one is processed on its own"
        )]
        dirs: Vec<PathBuf>,

        #[arg(
            long,
            env = "DAOGEN_SCHEMA_FILE",
            default_value = "schema.json",
            help = "Schema file name, relative to each directory"
        )]
        schema_file: String,

        #[arg(
            long,
            value_enum,
            help = "Relationship vocabulary for schemas without a `relationFormat` key \
                    [default: extended]"
        )]
        relation_format: Option<RelationFormat>,

        #[arg(
            long,
            default_value = "none",
            value_parser = ["none", "serialize", "deserialize", "both"],
            help = "Automatically derive serde Serialize / Deserialize traits for the Model struct"
        )]
        with_serde: String,

        #[arg(
            long,
            value_enum,
            default_value_t = DateTimeCrate::Chrono,
            help = "The datetime crate to use for `date` properties"
        )]
        date_time_crate: DateTimeCrate,

        #[arg(long, help = "Generate index file as `lib.rs` instead of `mod.rs`")]
        lib: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DateTimeCrate {
    Chrono,
    Time,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RelationFormat {
    Legacy,
    Extended,
}
