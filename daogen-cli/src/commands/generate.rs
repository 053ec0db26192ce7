use daogen::{RelationFormat as SchemaRelationFormat, SchemaCompiler, SchemaDef};
use daogen_codegen::{
    DateTimeCrate as CodegenDateTimeCrate, EntityWriter, EntityWriterContext, OutputFile,
    WithSerde, merge_entity_file, preserve_old_content,
};
use std::{error::Error, fs, path::Path, str::FromStr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::{Commands, DateTimeCrate, RelationFormat};

pub fn run_generate_command(command: Commands, verbose: bool) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Generate {
            dirs,
            schema_file,
            relation_format,
            with_serde,
            date_time_crate,
            lib,
        } => {
            if verbose {
                let _ = tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .with_test_writer()
                    .try_init();
            } else {
                let filter_layer = EnvFilter::try_new("daogen=info,daogen_codegen=info")?;
                let fmt_layer = tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(false)
                    .without_time();

                let _ = tracing_subscriber::registry()
                    .with(filter_layer)
                    .with(fmt_layer)
                    .try_init();
            }

            let mut compiler = SchemaCompiler::new();
            if let Some(relation_format) = relation_format {
                compiler = compiler.relation_format(relation_format.into());
            }
            let writer_context = EntityWriterContext::new(
                WithSerde::from_str(&with_serde)?,
                date_time_crate.into(),
                lib,
            );

            // a failing directory does not stop the others
            let mut failed = 0;
            for dir in dirs.iter() {
                match generate_dir(dir, &schema_file, &compiler, &writer_context) {
                    Ok(written) => println!("{}: wrote {written} file(s)", dir.display()),
                    Err(err) => {
                        failed += 1;
                        println!("{}: {err}", dir.display());
                    }
                }
            }

            if failed > 0 {
                return Err(format!("{failed} of {} schema(s) failed", dirs.len()).into());
            }
            println!("... Done.");
        }
    }

    Ok(())
}

/// Compile `<dir>/<schema_file>` and write the entity files into the output
/// directory the schema names, relative to the schema file
fn generate_dir(
    dir: &Path,
    schema_file: &str,
    compiler: &SchemaCompiler,
    writer_context: &EntityWriterContext,
) -> Result<usize, Box<dyn Error>> {
    let schema_path = dir.join(schema_file);
    let json = fs::read_to_string(&schema_path)
        .map_err(|err| format!("Fail to read `{}`: {err}", schema_path.display()))?;
    let def: SchemaDef = json.parse()?;
    let output_dir = schema_path.parent().unwrap_or(dir).join(def.output_dir()?);

    let compilation = compiler.compile(&def)?;
    for skipped in compilation.skipped.iter() {
        println!("Skipped {skipped}");
    }

    let output = EntityWriter::new(&compilation.schema).generate(writer_context);
    fs::create_dir_all(&output_dir)?;

    for OutputFile {
        name,
        content,
        mergeable,
    } in output.files.iter()
    {
        let file_path = output_dir.join(name);
        let content = match fs::read_to_string(&file_path) {
            Ok(old) if *mergeable => merge_entity_file(&old, content).unwrap_or_else(|err| {
                warn!("Cannot merge `{}`: {err}", file_path.display());
                preserve_old_content(&old, content)
            }),
            _ => content.clone(),
        };
        println!("Writing {}", file_path.display());
        fs::write(&file_path, content)?;
    }

    Ok(output.files.len())
}

impl From<DateTimeCrate> for CodegenDateTimeCrate {
    fn from(date_time_crate: DateTimeCrate) -> CodegenDateTimeCrate {
        match date_time_crate {
            DateTimeCrate::Chrono => CodegenDateTimeCrate::Chrono,
            DateTimeCrate::Time => CodegenDateTimeCrate::Time,
        }
    }
}

impl From<RelationFormat> for SchemaRelationFormat {
    fn from(relation_format: RelationFormat) -> SchemaRelationFormat {
        match relation_format {
            RelationFormat::Legacy => SchemaRelationFormat::Legacy,
            RelationFormat::Extended => SchemaRelationFormat::Extended,
        }
    }
}
