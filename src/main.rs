// kiz - A small prototype-based scripting language
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! CLI entry point: `kiz <path>` / `kiz run <path>` execute a source
//! file, `kiz repl` (or no arguments) starts the interactive loop,
//! `kiz version` and `kiz help` print metadata.

use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::rc::Rc;

use kiz_core::Object;
use kiz_vm::{Vm, compile_source, render_traceback};

mod repl;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl::run(),
        2 => match args[1].as_str() {
            "version" => println!("kiz version : {}", VERSION),
            "repl" => repl::run(),
            "help" => show_help(),
            path => run_file(path),
        },
        3 if args[1] == "run" => run_file(&args[2]),
        _ => {
            eprintln!("Error: invalid arguments");
            show_help();
            process::exit(1);
        }
    }
}

/// Compile and execute a source file as the main module; uncaught errors
/// print their traceback and exit non-zero.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading '{}': {}", path, e);
            process::exit(1);
        }
    };

    let code = match compile_source(&source) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("SyntaxError in '{}': {}", path, e);
            process::exit(1);
        }
    };

    let mut vm = Vm::new();
    vm.add_source(path, source);
    let module = Object::module(file_stem(path), path, Some(Rc::new(code)));
    if let Err(uncaught) = vm.set_main_module(module) {
        eprint!("{}", render_traceback(vm.sources(), &uncaught));
        process::exit(1);
    }
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn show_help() {
    let text = r#"
  _      _
 | | __ (_)  ____
 | |/ / | | |_  /
 |   <  | |  / /
 |_|\_\ |_| /___|


the kiz cmd help
===========================
- repl
  start the interactive loop
  > kiz repl

- run
  run a kiz source file
  > kiz run demo.kiz
  or
  > kiz demo.kiz

- version
  show the version of kiz
  > kiz version

- help
  show this page
  > kiz help
"#;
    println!("{}", text);
}
