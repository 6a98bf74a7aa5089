//! dd-render - bind a page element and apply data updates
//!
//! Usage: dd-render <page.html> [data.json] [key=value ...] [--data <file>] [--el <selector>] [--config <file>]
//!
//! Prints the bound element's final markup and the number of renders.

use anyhow::{bail, Context, Result};
use doubledollar::{Page, PageConfig, React, ReactOptions, Value};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: dd-render <page.html> [data.json] [key=value ...] [--data <file>] [--el <selector>] [--config <file>]";

struct Args {
    html: String,
    data: Option<String>,
    updates: Vec<(String, String)>,
    el: String,
    config: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = args.into_iter();
    let mut html = None;
    let mut data = None;
    let mut updates = Vec::new();
    let mut el = "#app".to_string();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--el" => el = args.next().context("--el needs a selector")?,
            "--data" => data = Some(args.next().context("--data needs a file")?),
            "--config" => config = Some(args.next().context("--config needs a file")?),
            _ if arg.starts_with("--") => bail!("unknown option {arg}"),
            _ => {
                if html.is_none() {
                    html = Some(arg);
                } else if data.is_none() && Path::new(&arg).is_file() {
                    // An existing file wins even if its name contains '='
                    data = Some(arg);
                } else if let Some((key, value)) = arg.split_once('=') {
                    updates.push((key.to_string(), value.to_string()));
                } else if data.is_none() {
                    data = Some(arg);
                } else {
                    bail!("unexpected argument {arg}");
                }
            }
        }
    }

    let Some(html) = html else {
        bail!(USAGE);
    };
    Ok(Args {
        html,
        data,
        updates,
        el,
        config,
    })
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => PageConfig::from_file(path).with_context(|| format!("reading config {path}"))?,
        None => PageConfig::default(),
    };

    let markup = std::fs::read_to_string(&args.html)
        .with_context(|| format!("reading {}", args.html))?;
    let page = Page::from_html(&markup, config).context("building page")?;

    let mut options = ReactOptions::new(args.el.as_str());
    if let Some(path) = &args.data {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let serde_json::Value::Object(object) =
            serde_json::from_str::<serde_json::Value>(&json).with_context(|| format!("parsing {path}"))?
        else {
            bail!("{path}: data must be a JSON object");
        };
        options = options.with_json(object);
    }
    // Keys only given as updates still need a binding
    for (key, _) in &args.updates {
        if !options.data.iter().any(|(k, _)| k == key) {
            options = options.with(key, Value::Undefined);
        }
    }

    let mut app = React::new(&page, options).with_context(|| format!("binding {}", args.el))?;
    tracing::info!(el = %args.el, keys = app.data().count(), "bound");

    for (key, value) in &args.updates {
        app.set(key, Value::parse_literal(value))
            .with_context(|| format!("setting {key}"))?;
    }

    println!("{}", page.document().inner_html(app.el())?);
    println!("renders: {}", app.render_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_positional_forms() {
        let parsed = args(&["page.html", "name=B", "--el", "#root", "n=2"]).unwrap();
        assert_eq!(parsed.html, "page.html");
        assert_eq!(parsed.data, None);
        assert_eq!(parsed.el, "#root");
        assert_eq!(
            parsed.updates,
            vec![("name".to_string(), "B".to_string()), ("n".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_data_file_with_equals_in_name() {
        let path = std::env::temp_dir().join(format!("dd-render-a=b-{}.json", std::process::id()));
        std::fs::write(&path, "{}").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let parsed = args(&["page.html", &path_str, "x=1"]).unwrap();
        assert_eq!(parsed.data.as_deref(), Some(path_str.as_str()));
        assert_eq!(parsed.updates, vec![("x".to_string(), "1".to_string())]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_explicit_data_option() {
        let parsed = args(&["page.html", "--data", "d=1.json"]).unwrap();
        assert_eq!(parsed.data.as_deref(), Some("d=1.json"));
        assert!(parsed.updates.is_empty());
    }

    #[test]
    fn test_missing_page() {
        assert!(args(&[]).is_err());
        assert!(args(&["--bogus"]).is_err());
    }
}
