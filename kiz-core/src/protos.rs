// kiz-core - Prototype singletons
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! The per-variant prototype singletons.
//!
//! One prototype object exists per variant; every constructed value
//! points at its variant's prototype through `__parent__`, and the
//! prototypes (except the root object prototype) point at `based_obj`.
//! The VM is single-threaded, so the singletons live in a thread-local
//! and are created on first use; their magic methods are installed by
//! `builtins::register_builtins` at VM construction.

use crate::object::Object;

thread_local! {
    static PROTOTYPES: Prototypes = Prototypes::new();
}

/// Handles to the thirteen prototype singletons.
#[derive(Clone)]
pub struct Prototypes {
    pub object: Object,
    pub nil: Object,
    pub boolean: Object,
    pub int: Object,
    pub decimal: Object,
    pub rational: Object,
    pub string: Object,
    pub list: Object,
    pub dict: Object,
    pub function: Object,
    pub native: Object,
    pub error: Object,
    pub module: Object,
}

impl Prototypes {
    fn new() -> Self {
        let object = Object::bare();
        let child = || {
            let proto = Object::bare();
            proto.set_attr(crate::magic::PARENT, object.clone());
            proto
        };
        Prototypes {
            nil: child(),
            boolean: child(),
            int: child(),
            decimal: child(),
            rational: child(),
            string: child(),
            list: child(),
            dict: child(),
            function: child(),
            native: child(),
            error: child(),
            module: child(),
            object,
        }
    }
}

/// The prototype singletons of the current thread.
pub fn prototypes() -> Prototypes {
    PROTOTYPES.with(|protos| protos.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic;

    #[test]
    fn singletons_are_stable() {
        assert!(prototypes().int.is(&prototypes().int));
        assert!(!prototypes().int.is(&prototypes().boolean));
    }

    #[test]
    fn chains_terminate_at_based_obj() {
        let protos = prototypes();
        for proto in [&protos.int, &protos.error, &protos.module, &protos.nil] {
            let parent = proto.get_attr_local(magic::PARENT).unwrap();
            assert!(parent.is(&protos.object));
        }
        assert!(protos.object.get_attr_local(magic::PARENT).is_none());
    }
}
