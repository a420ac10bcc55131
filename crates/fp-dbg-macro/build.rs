use fp_dbg_core::config::{BuildMode, Config, ENV_MODE, ENV_WIDTH};

fn main() {
    // The macros read these through `option_env!`; a change must re-expand every caller.
    for key in [ENV_MODE, ENV_WIDTH] {
        println!("cargo:rerun-if-env-changed={key}");
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }

    match Config::from_env() {
        Ok(Config {
            mode: BuildMode::Other(name),
            ..
        }) => {
            println!(
                "cargo:warning=unrecognized {ENV_MODE}={name:?}, instrumenting as in development"
            );
        }
        Ok(_) => {}
        Err(err) => println!("cargo:warning={err}"),
    }
}
