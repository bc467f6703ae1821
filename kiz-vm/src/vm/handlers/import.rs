// kiz-vm - Module import engine
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Synchronous module import.
//!
//! Resolution order: the module cache, then the filesystem (working
//! directory, parent directory, executable directory), then the
//! standard-module initializers. File imports compile the source, run
//! the module frame to completion, copy its non-private locals into the
//! module's attributes, cache it by path and bind it in the importing
//! frame. Nested imports recurse through the same machinery.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;

use kiz_core::{Error, Object, Result, magic};

use crate::compiler;
use crate::vm::frame::CallFrame;
use crate::vm::Vm;

impl Vm {
    pub(crate) fn exec_import(&mut self, name_idx: usize) -> Result<()> {
        let module_path = self.name_at(name_idx)?;

        // Cache hit: re-bind under the cached module's path.
        if let Some(module) = self.loaded_modules.get(&module_path) {
            let bind_name = module
                .module_def()
                .map(|def| def.path)
                .unwrap_or_else(|| module_path.clone());
            self.current_frame_mut()?.locals.insert(bind_name, module);
            return Ok(());
        }

        // Filesystem search.
        if let Some(found) = find_module_file(&module_path) {
            let source = fs::read_to_string(&found).map_err(|e| {
                Error::path_error(format!("cannot read module {}: {}", module_path, e))
            })?;
            return self.import_from_source(&module_path, source);
        }

        // Standard modules: call the initializer and push its module.
        if let Some(init) = self.std_modules.get(&module_path) {
            let module = self.call_values(&init, Vec::new(), Some(init.clone()))?;
            let bind_name = module
                .module_def()
                .map(|def| def.name)
                .unwrap_or_else(|| module_path.clone());
            self.loaded_modules.insert(module_path.clone(), module.clone());
            self.current_frame_mut()?
                .locals
                .insert(bind_name, module.clone());
            self.push(module);
            return Ok(());
        }

        Err(Error::path_error(format!(
            "Undefined module named {}",
            module_path
        )))
    }

    /// Compile and execute a file-sourced module, then export and bind
    /// it.
    fn import_from_source(&mut self, module_path: &str, source: String) -> Result<()> {
        debug!("importing module {}", module_path);
        self.sources.insert(module_path.to_string(), source.clone());

        let code = compiler::compile_source(&source)
            .map_err(|e| Error::syntax_error(e.to_string()))?;
        let code = Rc::new(code);
        let module = Object::module(file_stem(module_path), module_path, Some(code.clone()));

        let return_to = self.current_frame()?.pc + 1;
        let floor = self.call_stack.len();
        self.call_stack.push(CallFrame::new(
            module_path,
            module.clone(),
            code,
            return_to,
        ));

        // Run exactly the frame just pushed; nested imports recurse.
        self.run_import(floor)?;

        // Copy exports: every local not prefixed __private__; a string
        // __name__ local overrides the bind name.
        let mut bind_name = file_stem(module_path);
        let module_frame = self.current_frame()?;
        for (name, local) in module_frame.locals.to_vec() {
            if name.starts_with(magic::PRIVATE_PREFIX) {
                continue;
            }
            if name == magic::MODULE_NAME
                && let Some(text) = local.str_value()
            {
                bind_name = text;
            }
            if local.function_def().is_some() {
                local.set_attr(magic::OWNER_MODULE, module.clone());
            }
            module.set_attr(name, local);
        }
        self.call_stack.pop();

        self.loaded_modules.insert(module_path, module.clone());
        self.current_frame_mut()?.locals.insert(bind_name, module);
        Ok(())
    }

    /// Drive the module frame at `floor` until it completes. Frames
    /// above it pop as usual; the module frame itself is kept for the
    /// export copy. An exception propagates through the importer as if
    /// the IMPORT opcode itself threw.
    fn run_import(&mut self, floor: usize) -> Result<()> {
        while self.running && self.call_stack.len() > floor {
            let idx = self.call_stack.len() - 1;
            let frame = &self.call_stack[idx];
            if frame.pc >= frame.code.code.len() {
                if idx == floor {
                    return Ok(());
                }
                self.call_stack.pop();
                continue;
            }
            let inst = frame.code.code[frame.pc];

            // A top-level return ends the module; the frame is kept for
            // the export copy and the value is discarded.
            if matches!(inst.op, kiz_core::Op::Ret) && idx == floor {
                self.op_stack.pop();
                return Ok(());
            }

            match self.execute(inst) {
                Ok(()) => {
                    if crate::vm::advances_pc(inst.op) {
                        self.call_stack[idx].pc += 1;
                    }
                }
                Err(Error::Raised { name, message }) => {
                    match self.instruction_throw(&name, &message) {
                        Ok(()) | Err(Error::Caught) => {}
                        Err(other) => return Err(other),
                    }
                    if self.call_stack.len() <= floor {
                        return Err(Error::Caught);
                    }
                }
                Err(Error::Caught) => {
                    if self.call_stack.len() <= floor {
                        return Err(Error::Caught);
                    }
                }
                Err(other) => return Err(other),
            }
        }
        if !self.running {
            return Err(Error::Stop);
        }
        Ok(())
    }
}

/// Search the base paths in order for a regular file named by the module
/// path.
fn find_module_file(module_path: &str) -> Option<PathBuf> {
    for base in search_bases() {
        let candidate = base.join(module_path);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Working directory, parent directory, executable directory.
fn search_bases() -> Vec<PathBuf> {
    let mut bases = vec![PathBuf::from("."), PathBuf::from("..")];
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        bases.push(dir.to_path_buf());
    }
    bases
}

/// The bind name a module defaults to: its file name without the last
/// extension.
fn file_stem(module_path: &str) -> String {
    Path::new(module_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| module_path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_strips_one_extension() {
        assert_eq!(file_stem("utils.kiz"), "utils");
        assert_eq!(file_stem("lib/utils.kiz"), "utils");
        assert_eq!(file_stem("plain"), "plain");
    }
}
