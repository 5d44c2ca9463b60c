//! Module-type dispatch: resolved AST → element descriptor.

use crate::ast::Module;
use crate::element::{Element, SourceEntry};
use crate::eval::{as_map, as_string, as_string_list};
use std::collections::BTreeSet;
use thiserror::Error;

/// Raised by a handler for a malformed module it cannot safely render.
/// No current handler raises this — missing data is a skip, not an error —
/// but the type exists so a future handler has somewhere to put one.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to convert {module_type} '{name}': {reason}")]
pub struct ConversionError {
    pub module_type: String,
    pub name: String,
    pub reason: String,
}

/// Types whose conversion is deliberately a no-op; reported under `skipped`.
const DELIBERATELY_SKIPPED: &[&str] = &[
    "package",
    "license",
    "ndk_headers",
    "ndk_library",
    "cc_test",
    "cc_test_host",
    "cc_fuzz",
    "cc_benchmark",
    "genrule",
    "filegroup",
    "vndk_prebuilt_shared",
];

pub enum Outcome {
    Element { filename: String, element: Element },
    Skipped(String),
    Unsupported(String),
    Error(String),
}

fn label(module: &Module) -> String {
    match module.name() {
        Some(name) => format!("{} '{}'", module.module_type, name),
        None => format!("{} <unnamed>", module.module_type),
    }
}

/// Dispatch a single resolved+evaluated module to its handler.
pub fn convert_module(module: &Module, target_arch: &str, source_dir: Option<&str>) -> Outcome {
    match module.module_type.as_str() {
        "cc_library_static" => library(module, "static", target_arch, source_dir),
        "cc_library_shared" | "cc_library" => library(module, "shared", target_arch, source_dir),
        "cc_binary" | "cc_binary_host" => binary(module, target_arch, source_dir),
        "prebuilt_etc" | "prebuilt_etc_host" => prebuilt_etc(module),
        "cc_defaults" => Outcome::Skipped(label(module)),
        t if DELIBERATELY_SKIPPED.contains(&t) => Outcome::Skipped(label(module)),
        _ => Outcome::Unsupported(label(module)),
    }
}

fn arch_overlay(module: &Module, target_arch: &str, prop: &str) -> Vec<String> {
    let Some(arch_map) = module.property("arch").and_then(as_map) else {
        return Vec::new();
    };
    let Some(overlay) = arch_map
        .iter()
        .find(|p| p.name == target_arch)
        .and_then(|p| as_map(&p.value))
    else {
        return Vec::new();
    };
    overlay
        .iter()
        .find(|p| p.name == prop)
        .map(|p| as_string_list(&p.value))
        .unwrap_or_default()
}

fn combined_list(module: &Module, prop: &str, target_arch: &str) -> Vec<String> {
    let mut values = module.property(prop).map(as_string_list).unwrap_or_default();
    values.extend(arch_overlay(module, target_arch, prop));
    values
}

fn depends_for_libs(module: &Module) -> Vec<String> {
    let mut depends = vec!["base/aosp-sdk.bst".to_string()];
    for prop in ["static_libs", "shared_libs", "whole_static_libs", "header_libs"] {
        for lib in module.property(prop).map(as_string_list).unwrap_or_default() {
            depends.push(format!("external/{lib}.bst"));
        }
    }
    depends
}

fn include_flags(module: &Module) -> Option<String> {
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    for prop in ["local_include_dirs", "include_dirs", "export_include_dirs"] {
        for dir in module.property(prop).map(as_string_list).unwrap_or_default() {
            dirs.insert(dir);
        }
    }
    if dirs.is_empty() {
        return None;
    }
    Some(
        dirs.iter()
            .map(|d| format!("-I{d}"))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn library(module: &Module, build_type: &str, target_arch: &str, source_dir: Option<&str>) -> Outcome {
    let Some(name) = module.name() else {
        return Outcome::Skipped(label(module));
    };

    let mut element = Element::new("aosp_cc");
    element.depends = depends_for_libs(module);
    if let Some(dir) = source_dir.filter(|d| !d.is_empty()) {
        element.sources.push(SourceEntry {
            kind: "local_external".to_string(),
            path: dir.to_string(),
        });
    }
    element.set_variable("build-type", build_type);
    element.set_variable("lib-name", name);
    element.set_variable("src-files", combined_list(module, "srcs", target_arch).join(" "));
    element.set_variable("extra-cflags", combined_list(module, "cflags", target_arch).join(" "));
    if let Some(flags) = include_flags(module) {
        element.set_variable("include-flags", flags);
    }

    Outcome::Element {
        filename: format!("{name}.bst"),
        element,
    }
}

fn binary(module: &Module, target_arch: &str, source_dir: Option<&str>) -> Outcome {
    let Some(name) = module.name() else {
        return Outcome::Skipped(label(module));
    };

    let mut element = Element::new("aosp_cc");
    element.depends = depends_for_libs(module);
    if let Some(dir) = source_dir.filter(|d| !d.is_empty()) {
        element.sources.push(SourceEntry {
            kind: "local_external".to_string(),
            path: dir.to_string(),
        });
    }
    element.set_variable("build-type", "binary");
    element.set_variable("binary-name", name);
    element.set_variable("src-files", combined_list(module, "srcs", target_arch).join(" "));
    element.set_variable("extra-cflags", combined_list(module, "cflags", target_arch).join(" "));
    if let Some(flags) = include_flags(module) {
        element.set_variable("include-flags", flags);
    }

    Outcome::Element {
        filename: format!("{name}.bst"),
        element,
    }
}

fn prebuilt_etc(module: &Module) -> Outcome {
    let (Some(name), Some(src)) = (
        module.name(),
        module.property("src").and_then(as_string),
    ) else {
        return Outcome::Skipped(label(module));
    };

    let mut element = Element::new("import");
    element.set_config("source", src);
    element.set_config("target", "/etc");

    Outcome::Element {
        filename: format!("{name}.bst"),
        element,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Property};

    fn module(module_type: &str, props: Vec<Property>) -> Module {
        Module::new(module_type, props)
    }

    fn named(name: &str, props: Vec<Property>) -> Vec<Property> {
        let mut all = vec![Property::new("name", Expression::String(name.into()))];
        all.extend(props);
        all
    }

    #[test]
    fn simple_static_library() {
        let m = module(
            "cc_library_static",
            named(
                "libbz",
                vec![Property::new(
                    "srcs",
                    Expression::List(vec![
                        Expression::String("blocksort.c".into()),
                        Expression::String("bzlib.c".into()),
                    ]),
                )],
            ),
        );
        let outcome = convert_module(&m, "x86_64", None);
        match outcome {
            Outcome::Element { filename, element } => {
                assert_eq!(filename, "libbz.bst");
                assert_eq!(element.kind.as_deref(), Some("aosp_cc"));
                assert!(element.variables.contains(&("build-type".to_string(), "static".to_string())));
                assert!(element.variables.contains(&("src-files".to_string(), "blocksort.c bzlib.c".to_string())));
                assert_eq!(element.depends, vec!["base/aosp-sdk.bst".to_string()]);
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn cc_library_defaults_to_shared() {
        let m = module("cc_library", named("y", vec![]));
        let Outcome::Element { element, .. } = convert_module(&m, "x86_64", None) else { panic!() };
        assert!(element.variables.contains(&("build-type".to_string(), "shared".to_string())));
    }

    #[test]
    fn architecture_overlay_extends_srcs_and_cflags() {
        let arch = Expression::Map(vec![Property::new(
            "x86_64",
            Expression::Map(vec![
                Property::new("srcs", Expression::List(vec![Expression::String("x64.c".into())])),
                Property::new("cflags", Expression::List(vec![Expression::String("-msse2".into())])),
            ]),
        )]);
        let m = module(
            "cc_library_shared",
            named(
                "y",
                vec![
                    Property::new("srcs", Expression::List(vec![Expression::String("base.c".into())])),
                    Property::new("arch", arch),
                ],
            ),
        );
        let Outcome::Element { element, .. } = convert_module(&m, "x86_64", None) else { panic!() };
        assert!(element.variables.contains(&("src-files".to_string(), "base.c x64.c".to_string())));
        assert!(element.variables.contains(&("extra-cflags".to_string(), "-msse2".to_string())));
    }

    #[test]
    fn binary_dependency_translation() {
        let m = module(
            "cc_binary",
            named(
                "bz",
                vec![
                    Property::new("srcs", Expression::List(vec![Expression::String("m.c".into())])),
                    Property::new("static_libs", Expression::List(vec![Expression::String("libbz".into())])),
                    Property::new("shared_libs", Expression::List(vec![Expression::String("libz".into())])),
                ],
            ),
        );
        let Outcome::Element { element, filename } = convert_module(&m, "x86_64", None) else { panic!() };
        assert_eq!(filename, "bz.bst");
        assert_eq!(
            element.depends,
            vec![
                "base/aosp-sdk.bst".to_string(),
                "external/libbz.bst".to_string(),
                "external/libz.bst".to_string(),
            ]
        );
        assert!(element.variables.contains(&("binary-name".to_string(), "bz".to_string())));
    }

    #[test]
    fn prebuilt_etc_emits_import() {
        let m = module(
            "prebuilt_etc",
            named("hosts", vec![Property::new("src", Expression::String("hosts".into()))]),
        );
        let Outcome::Element { element, .. } = convert_module(&m, "x86_64", None) else { panic!() };
        assert_eq!(element.kind.as_deref(), Some("import"));
        assert!(element.config.contains(&("target".to_string(), "/etc".to_string())));
    }

    #[test]
    fn unknown_type_is_unsupported_not_error() {
        let m = module("my_unknown_module", named("z", vec![]));
        assert!(matches!(convert_module(&m, "x86_64", None), Outcome::Unsupported(_)));
    }

    #[test]
    fn cc_defaults_is_always_skipped() {
        let m = module("cc_defaults", named("A", vec![]));
        assert!(matches!(convert_module(&m, "x86_64", None), Outcome::Skipped(_)));
    }

    #[test]
    fn include_flags_are_sorted_and_deduped() {
        let m = module(
            "cc_library_static",
            named(
                "x",
                vec![
                    Property::new("local_include_dirs", Expression::List(vec![Expression::String("b".into())])),
                    Property::new("include_dirs", Expression::List(vec![Expression::String("a".into()), Expression::String("b".into())])),
                ],
            ),
        );
        let Outcome::Element { element, .. } = convert_module(&m, "x86_64", None) else { panic!() };
        assert!(element.variables.contains(&("include-flags".to_string(), "-Ia -Ib".to_string())));
    }
}
