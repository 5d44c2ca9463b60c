//! `cc_defaults` inheritance resolution.

use crate::ast::{Expression, Module, Property};
use crate::eval::as_string_list;
use std::collections::{HashMap, HashSet};

const CC_DEFAULTS: &str = "cc_defaults";

/// Registry of named `cc_defaults` modules, built once per file.
pub struct DefaultsRegistry<'a> {
    by_name: HashMap<&'a str, &'a Module>,
}

impl<'a> DefaultsRegistry<'a> {
    pub fn build(modules: impl Iterator<Item = &'a Module>) -> Self {
        let mut by_name = HashMap::new();
        for m in modules {
            if m.module_type == CC_DEFAULTS {
                if let Some(name) = m.name() {
                    by_name.insert(name, m);
                }
            }
        }
        Self { by_name }
    }

    /// Resolve `module` against this registry, merging its defaults chain.
    /// A module with no `defaults` property is returned unchanged.
    pub fn resolve(&self, module: &Module) -> Module {
        let Some(defaults_expr) = module.property("defaults") else {
            return module.clone();
        };
        let names = as_string_list(defaults_expr);
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        for name in &names {
            self.collect_chain(name, &mut visited, &mut chain);
        }

        let mut acc: Vec<Property> = Vec::new();
        for default_module in &chain {
            for prop in &default_module.properties {
                merge_into(&mut acc, prop);
            }
        }
        for prop in &module.properties {
            if prop.name == "defaults" {
                continue;
            }
            merge_into(&mut acc, prop);
        }

        if module.name().is_some() && !acc.iter().any(|p| p.name == "name") {
            if let Some(name_prop) = module.properties.iter().find(|p| p.name == "name") {
                acc.push(name_prop.clone());
            }
        }

        Module {
            module_type: module.module_type.clone(),
            properties: acc,
            span: module.span,
        }
    }

    /// Depth-first collection of a defaults name's own chain, deepest first,
    /// with a visited set so cycles terminate harmlessly.
    fn collect_chain(&self, name: &str, visited: &mut HashSet<String>, out: &mut Vec<&'a Module>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        let Some(&module) = self.by_name.get(name) else {
            return; // unknown defaults name: may be defined in another file
        };
        if let Some(nested) = module.property("defaults") {
            for nested_name in as_string_list(nested) {
                self.collect_chain(&nested_name, visited, out);
            }
        }
        out.push(module);
    }
}

/// Merge a single incoming property into an accumulator, following the
/// type-directed rules in §4.4 of the spec.
fn merge_into(acc: &mut Vec<Property>, incoming: &Property) {
    if incoming.name == "name" || incoming.name == "defaults" {
        return;
    }
    if let Some(existing) = acc.iter_mut().find(|p| p.name == incoming.name) {
        existing.value = merge_values(existing.value.clone(), incoming.value.clone());
    } else {
        acc.push(incoming.clone());
    }
}

fn merge_values(existing: Expression, incoming: Expression) -> Expression {
    match (existing, incoming) {
        (Expression::List(mut a), Expression::List(b)) => {
            a.extend(b);
            Expression::List(a)
        }
        (Expression::Map(a), Expression::Map(b)) => {
            let mut acc = a;
            for prop in &b {
                merge_into(&mut acc, prop);
            }
            Expression::Map(acc)
        }
        (_, incoming) => incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Property;

    fn cc_defaults(name: &str, props: Vec<Property>) -> Module {
        let mut all = vec![Property::new("name", Expression::String(name.into()))];
        all.extend(props);
        Module::new(CC_DEFAULTS, all)
    }

    #[test]
    fn list_property_concatenates_through_chain() {
        let a = cc_defaults("A", vec![Property::new("cflags", Expression::List(vec![Expression::String("-a".into())]))]);
        let b = cc_defaults(
            "B",
            vec![
                Property::new("defaults", Expression::List(vec![Expression::String("A".into())])),
                Property::new("cflags", Expression::List(vec![Expression::String("-b".into())])),
            ],
        );
        let m = Module::new(
            "cc_library_static",
            vec![
                Property::new("name", Expression::String("m".into())),
                Property::new("defaults", Expression::List(vec![Expression::String("B".into())])),
                Property::new("cflags", Expression::List(vec![Expression::String("-c".into())])),
            ],
        );
        let registry = DefaultsRegistry::build(vec![&a, &b].into_iter());
        let resolved = registry.resolve(&m);
        let cflags = resolved.property("cflags").unwrap();
        assert_eq!(
            cflags,
            &Expression::List(vec![
                Expression::String("-a".into()),
                Expression::String("-b".into()),
                Expression::String("-c".into()),
            ])
        );
        assert_eq!(resolved.name(), Some("m"));
    }

    #[test]
    fn unknown_defaults_name_is_silently_skipped() {
        let m = Module::new(
            "cc_library_static",
            vec![
                Property::new("name", Expression::String("m".into())),
                Property::new("defaults", Expression::List(vec![Expression::String("ghost".into())])),
            ],
        );
        let registry = DefaultsRegistry::build(std::iter::empty());
        let resolved = registry.resolve(&m);
        assert_eq!(resolved.name(), Some("m"));
    }

    #[test]
    fn cycle_terminates() {
        let a = cc_defaults(
            "A",
            vec![
                Property::new("defaults", Expression::List(vec![Expression::String("B".into())])),
                Property::new("cflags", Expression::List(vec![Expression::String("-a".into())])),
            ],
        );
        let b = cc_defaults(
            "B",
            vec![
                Property::new("defaults", Expression::List(vec![Expression::String("A".into())])),
                Property::new("cflags", Expression::List(vec![Expression::String("-b".into())])),
            ],
        );
        let m = Module::new(
            "cc_library_static",
            vec![
                Property::new("name", Expression::String("m".into())),
                Property::new("defaults", Expression::List(vec![Expression::String("A".into())])),
            ],
        );
        let registry = DefaultsRegistry::build(vec![&a, &b].into_iter());
        // Must terminate; exact order follows the cycle-broken chain (A -> B, B's back-edge to A dropped).
        let resolved = registry.resolve(&m);
        assert_eq!(
            resolved.property("cflags"),
            Some(&Expression::List(vec![
                Expression::String("-b".into()),
                Expression::String("-a".into()),
            ]))
        );
    }

    #[test]
    fn scalar_overwrite_on_mismatched_shapes() {
        let a = cc_defaults("A", vec![Property::new("vendor", Expression::Bool(true))]);
        let m = Module::new(
            "cc_library_static",
            vec![
                Property::new("name", Expression::String("m".into())),
                Property::new("defaults", Expression::List(vec![Expression::String("A".into())])),
                Property::new("vendor", Expression::Bool(false)),
            ],
        );
        let registry = DefaultsRegistry::build(std::iter::once(&a));
        let resolved = registry.resolve(&m);
        assert_eq!(resolved.property("vendor"), Some(&Expression::Bool(false)));
    }
}
