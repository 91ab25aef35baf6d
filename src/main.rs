use anyhow::Context;
use blogidx::generator::IndexGenerator;
use blogidx::tags::TagRules;
use clap::{command, Arg};
use log::info;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = command!()
        .args([
            Arg::new("blog_dir")
                .help("Directory containing blog post HTML files")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("Blogs"),
            Arg::new("tag_rules")
                .long("tag-rules")
                .help("JSON file overriding the built-in keyword-to-tag rules")
                .value_parser(clap::value_parser!(PathBuf)),
        ])
        .get_matches();

    let blog_dir: &PathBuf = matches.get_one("blog_dir").unwrap();
    let rules = match matches.get_one::<PathBuf>("tag_rules") {
        Some(path) => TagRules::from_path(path)
            .with_context(|| format!("while loading tag rules from {}", path.display()))?,
        None => TagRules::default(),
    };

    let index = IndexGenerator::new(blog_dir, rules).generate()?;
    info!("Blog index generation complete ({} entries)", index.count);

    Ok(())
}
