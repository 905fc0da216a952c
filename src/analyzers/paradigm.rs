//! Structural paradigm classification, evaluated after extraction.

use std::collections::HashSet;

use crate::analyzers::extract::FileInventory;
use crate::core::{MethodBinding, Paradigm};

/// No classes: functional. All functions class-bound: oop. Both free
/// functions and class methods: mixed. A free function whose name appears
/// in a class's method list counts as bound (a later class registration
/// wins over an earlier plain definition of the same name).
pub fn classify(inventory: &FileInventory) -> Paradigm {
    if inventory.classes.is_empty() {
        return Paradigm::Functional;
    }

    let method_names: HashSet<&str> = inventory
        .classes
        .iter()
        .flat_map(|c| c.methods.iter().map(String::as_str))
        .collect();

    let has_free = inventory.functions.iter().any(|f| {
        f.binding == MethodBinding::Unbound && !method_names.contains(f.name.as_str())
    });

    if has_free {
        Paradigm::Mixed
    } else {
        Paradigm::Oop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::extract::extract;
    use indoc::indoc;

    #[test]
    fn no_classes_is_functional() {
        let inv = extract("f <- function(x) x\ng <- function(y) y\n");
        assert_eq!(classify(&inv), Paradigm::Functional);
    }

    #[test]
    fn empty_file_is_functional() {
        assert_eq!(classify(&extract("")), Paradigm::Functional);
    }

    #[test]
    fn only_class_methods_is_oop() {
        let src = indoc! {r#"
            MyClass <- R6Class("MyClass",
              public = list(
                greet = function() "hi",
                bye = function() "bye"
              )
            )
        "#};
        assert_eq!(classify(&extract(src)), Paradigm::Oop);
    }

    #[test]
    fn s3_only_file_is_oop() {
        let src = "print.point <- function(x) cat(x$x)\nformat.point <- function(x) paste(x)\n";
        assert_eq!(classify(&extract(src)), Paradigm::Oop);
    }

    #[test]
    fn free_function_beside_class_is_mixed() {
        let src = indoc! {r#"
            helper <- function(x) x + 1
            MyClass <- R6Class("MyClass",
              public = list(
                greet = function() "hi"
              )
            )
        "#};
        assert_eq!(classify(&extract(src)), Paradigm::Mixed);
    }

    #[test]
    fn plain_function_shadowed_by_method_registration_is_oop() {
        let src = indoc! {r#"
            area <- function(obj) 0
            Shape <- R6Class("Shape",
              public = list(
                area = function() self$w * self$h
              )
            )
        "#};
        // the free `area` shares its name with a class method, so the
        // class-bound registration wins for paradigm purposes
        assert_eq!(classify(&extract(src)), Paradigm::Oop);
    }
}
