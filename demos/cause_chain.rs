use classified_errors::{
    ClassifiedError, Result, ResultExt, chain_of, code_of, define_error_codes, ensure, render,
    root_cause,
};
use std::fs;

define_error_codes! {
    CONFIG = "config",
}

fn read_raw(path: &str) -> Result<String> {
    // Foreign error: gets the default code
    fs::read_to_string(path).wrap_err_with(|| format!("cannot read {path}"))
}

fn load_config(path: &str) -> Result<String> {
    ensure!(path.ends_with(".toml"), CONFIG, "{path} is not a TOML file");
    read_raw(path).wrap_err("configuration unavailable")
}

fn start(path: &str) -> Result<()> {
    let _config = load_config(path).classify(CONFIG, "startup aborted")?;
    Ok(())
}

fn main() {
    println!("--- Cause Chain Example ---\n");

    for path in ["settings.json", "/nonexistent/settings.toml"] {
        let Err(err) = start(path) else {
            continue;
        };

        println!("start({path:?})");
        println!("  code:       {}", code_of(&err));
        println!("  root cause: {}", root_cause(&err));
        println!("  chain:");
        for (depth, link) in chain_of(&err).enumerate() {
            let kind = if link.is::<ClassifiedError>() { "classified" } else { "foreign" };
            println!("    {depth}: [{kind}] {link}");
        }
        println!("  rendered:   {}\n", render(Some(&err)));
    }
}
