//! Minimal CLI: infer → (schema | csharp | rust)
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Deserialize;

use json_clazz::{
    Codegen, DuplicatePolicy, EmitOptions, Inference, InferOptions, SchemaIdentity, SchemaSet, Target,
};

/// Root class name when reading stdin and no `--root-type` is given.
const STDIN_ROOT: &str = "Root";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer classes from a JSON document and emit them as C# or Rust source
#[derive(Parser, Debug)]
#[command(name = "json-clazz")]
pub struct CommandLineInterface {
    /// debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the inferred schemas as JSON
    Schema(SchemaOut),
    /// infer and emit C# classes with Newtonsoft.Json attributes
    Csharp(CodeOut),
    /// infer and emit Rust structs deriving serde traits
    Rust(CodeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., default_value = "-")]
    input: Vec<String>,

    /// top-level class name (defaults to the input file stem)
    #[arg(long)]
    root_type: Option<String>,

    /// JSON config file with `infer`, `namespace` and `imports` keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// key nested schemas by their full property path instead of the property name alone
    #[arg(long, default_value_t = false)]
    by_path: bool,

    /// fail when a repeated key carries a different kind of value
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CodeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// namespace (C#) or module (Rust) wrapping the classes
    #[arg(long)]
    namespace: Option<String>,

    /// import/using line; repeat to replace the default set
    #[arg(long = "import")]
    imports: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long, conflicts_with = "split")]
    out: Option<PathBuf>,

    /// write one file per class into --out-dir
    #[arg(long, default_value_t = false)]
    split: bool,

    /// directory for --split output
    #[arg(long, default_value = ".", requires = "split")]
    out_dir: PathBuf,
}

/// Contents of `--config`. Command-line flags win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct Config {
    infer: InferOptions,
    namespace: Option<String>,
    imports: Option<Vec<String>>,
}

/// One JSON document to convert.
struct Source {
    label: String,
    root_alias: String,
    text: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<Config> {
        let Some(path) = self.config.as_ref() else {
            return Ok(Config::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str::<Config>(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(?config, "loaded config");
        Ok(config)
    }

    fn infer_options(&self, config: &Config) -> InferOptions {
        let mut options = config.infer.clone();
        if self.by_path {
            options.identity = SchemaIdentity::PropertyPath;
        }
        if self.strict {
            options.duplicates = DuplicatePolicy::Strict;
        }
        options
    }

    fn load_sources(&self) -> Result<Vec<Source>> {
        let mut sources = Vec::new();
        for entry in resolve_inputs(&self.input)? {
            let source = match entry {
                Input::Stdin => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("failed to read stdin")?;
                    Source {
                        label: "<stdin>".to_string(),
                        root_alias: self.root_type.clone().unwrap_or_else(|| STDIN_ROOT.to_string()),
                        text,
                    }
                }
                Input::File(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read source file {}", path.display()))?;
                    Source {
                        label: path.display().to_string(),
                        root_alias: self.root_type.clone().unwrap_or_else(|| file_stem(&path)),
                        text,
                    }
                }
            };
            sources.push(source);
        }
        Ok(sources)
    }
}

impl Source {
    fn infer(&self, inference: &Inference) -> Result<SchemaSet> {
        let (_, set) = inference
            .infer(&self.text, &self.root_alias)
            .with_context(|| format!("failed to infer classes from {}", self.label))?;
        tracing::info!(source = %self.label, classes = set.len(), "inferred");
        Ok(set)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => target.run(),
            Command::Csharp(target) => target.run(Target::CSharp),
            Command::Rust(target) => target.run(Target::Rust),
        }
    }
}

impl SchemaOut {
    fn run(&self) -> Result<()> {
        let config = self.input_settings.load_config()?;
        let inference = Inference::new(self.input_settings.infer_options(&config));
        let sources = self.input_settings.load_sources()?;

        let views = sources
            .par_iter()
            .map(|source| -> Result<serde_json::Value> { Ok(schema_view(&source.infer(&inference)?)) })
            .collect::<Result<Vec<_>>>()?;
        let view = match <[_; 1]>::try_from(views) {
            Ok([single]) => single,
            Err(many) => serde_json::Value::Array(many),
        };
        let schema_src = serde_json::to_string_pretty(&view)?;
        write_or_print(self.out.as_deref(), &schema_src)
    }
}

impl CodeOut {
    fn run(&self, target: Target) -> Result<()> {
        let config = self.input_settings.load_config()?;
        let inference = Inference::new(self.input_settings.infer_options(&config));
        let codegen = Codegen::new(EmitOptions {
            target,
            namespace: self
                .namespace
                .clone()
                .or(config.namespace)
                .unwrap_or_else(|| EmitOptions::default().namespace),
            imports: if self.imports.is_empty() { config.imports } else { Some(self.imports.clone()) },
        });
        let sources = self.input_settings.load_sources()?;

        // each document gets its own inference run; order of inputs is preserved
        let sets = sources
            .par_iter()
            .map(|source| source.infer(&inference))
            .collect::<Result<Vec<_>>>()?;

        if self.split {
            return self.write_split(&codegen, &sources, &sets);
        }

        let mut out = Vec::with_capacity(sets.len());
        for (source, set) in sources.iter().zip(&sets) {
            let src = codegen
                .emit(set)
                .with_context(|| format!("failed to emit classes for {}", source.label))?;
            out.push(src);
        }
        write_or_print(self.out.as_deref(), &out.join("\n"))
    }

    fn write_split(&self, codegen: &Codegen, sources: &[Source], sets: &[SchemaSet]) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;
        let mut written = HashSet::<PathBuf>::new();
        for (source, set) in sources.iter().zip(sets) {
            let files = codegen
                .emit_each(set)
                .with_context(|| format!("failed to emit classes for {}", source.label))?;
            for file in files {
                let path = self.out_dir.join(&file.file_name);
                if !written.insert(path.clone()) {
                    tracing::warn!(path = %path.display(), "class emitted by an earlier input is overwritten");
                }
                std::fs::write(&path, &file.source)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(class = %file.name, path = %path.display(), "wrote class");
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

enum Input {
    Stdin,
    File(PathBuf),
}

fn resolve_inputs<I>(patterns: I) -> Result<Vec<Input>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<Input>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Input::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern}"))? {
                out.push(Input::File(entry?));
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Input::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

fn file_stem(path: &Path) -> String {
    // `orders.sample.json` → `orders`
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(STDIN_ROOT)
        .to_string()
}

fn write_or_print(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Debug view: schemas in discovery order with their fields and kinds.
fn schema_view(set: &SchemaSet) -> serde_json::Value {
    let schemas = set
        .iter()
        .map(|(_, schema)| {
            let fields = schema
                .fields()
                .map(|f| serde_json::json!({ "key": f.raw_name, "kind": f.kind.describe(set) }))
                .collect::<Vec<_>>();
            serde_json::json!({
                "name": schema.raw_name,
                "class": schema.class_name().ok(),
                "fields": fields,
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(schemas)
}
