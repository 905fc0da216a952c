//! Coupling and cohesion estimators: CBO from namespace references, LCOM
//! from shared-identifier overlap, MPC as methods-per-class or
//! calls-per-function density. LCOM is a deliberately rough heuristic; the
//! contract is the qualitative ordering (more shared state means lower
//! LCOM), not the exact constants.

use std::collections::{BTreeSet, HashMap};

use crate::analyzers::extract::FileInventory;
use crate::analyzers::normalize::mask_strings;
use crate::analyzers::patterns;
use crate::core::MethodBinding;

/// Distinct referenced package names.
pub fn cbo(namespace_refs: &[String]) -> usize {
    namespace_refs.iter().collect::<BTreeSet<_>>().len()
}

/// Identifiers a function touches: assignment targets plus parameter names.
pub fn referenced_identifiers(body: &str) -> BTreeSet<String> {
    let masked = mask_strings(body);
    let mut idents: BTreeSet<String> = patterns::ASSIGNED_VAR
        .captures_iter(&masked)
        .map(|c| c[1].to_string())
        .collect();

    if let Some(params) = patterns::PARAM_LIST.captures(&masked) {
        for part in params[1].split(',') {
            let name = part.split('=').next().unwrap_or("").trim();
            if !name.is_empty() {
                idents.insert(name.to_string());
            }
        }
    }
    idents
}

/// Call expressions in a body, control keywords excluded.
pub fn count_calls(body: &str) -> usize {
    let masked = mask_strings(body);
    patterns::CALL_EXPR
        .captures_iter(&masked)
        .filter(|c| !patterns::is_call_keyword(&c[1]))
        .count()
}

fn disjoint_pairs(sets: &[BTreeSet<String>]) -> usize {
    let mut count = 0;
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            if sets[i].is_disjoint(&sets[j]) {
                count += 1;
            }
        }
    }
    count
}

/// LCOM for one file. OOP mode sums disjoint method pairs per class;
/// functional mode counts disjoint pairs across the file's functions.
/// Methods recorded without a recoverable body contribute an empty set.
pub fn lcom(inventory: &FileInventory) -> usize {
    if inventory.classes.is_empty() {
        let sets: Vec<BTreeSet<String>> = inventory
            .functions
            .iter()
            .map(|f| referenced_identifiers(&f.body))
            .collect();
        if sets.len() < 2 {
            return 0;
        }
        return disjoint_pairs(&sets);
    }

    // Method bodies looked up by name; a class-bound definition wins over a
    // free function of the same name.
    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for f in &inventory.functions {
        match f.binding {
            MethodBinding::BoundTo(_) => {
                by_name.insert(f.name.as_str(), f.body.as_str());
            }
            MethodBinding::Unbound => {
                by_name.entry(f.name.as_str()).or_insert(f.body.as_str());
            }
        }
    }

    let mut total = 0;
    for class in &inventory.classes {
        let sets: Vec<BTreeSet<String>> = class
            .methods
            .iter()
            .map(|m| {
                by_name
                    .get(m.as_str())
                    .map(|body| referenced_identifiers(body))
                    .unwrap_or_default()
            })
            .collect();
        if sets.len() >= 2 {
            total += disjoint_pairs(&sets);
        }
    }
    total
}

/// Methods-per-class for OOP files, call density per function otherwise.
pub fn mpc(inventory: &FileInventory, nom: usize) -> f64 {
    if !inventory.classes.is_empty() {
        let total_methods: usize = inventory.classes.iter().map(|c| c.methods.len()).sum();
        return total_methods as f64 / inventory.classes.len() as f64;
    }
    if nom == 0 {
        return 0.0;
    }
    let total_calls: usize = inventory.functions.iter().map(|f| count_calls(&f.body)).sum();
    total_calls as f64 / nom as f64
}
