use chppgen_core::{AnnotationIndex, DeclTable, RawField, TypeSpec};

use crate::test_utils::{sample_annotations, sample_decls, sample_request, wwan_annotations, wwan_decls, wwan_request};
use crate::{Config, Error, GenerationRequest, Generator};

#[test]
fn generate_renders_both_documents() {
    let decls = wwan_decls();
    let annotations = wwan_annotations();
    let generated = Generator::new(&decls, &annotations)
        .generate(&wwan_request())
        .unwrap();

    assert_eq!(generated.header.name(), "wwan_types.h");
    assert_eq!(generated.conversion.name(), "wwan_convert.c");
    assert!(generated.header.text().contains("struct ChppWwanCellInfoResult {\n"));
    assert!(
        generated
            .conversion
            .text()
            .contains("bool chppWwanCellInfoResultFromChre(\n")
    );
}

#[test]
fn generation_is_deterministic() {
    let decls = wwan_decls();
    let annotations = wwan_annotations();
    let generator = Generator::new(&decls, &annotations);
    assert_eq!(
        generator.generate(&wwan_request()).unwrap(),
        generator.generate(&wwan_request()).unwrap()
    );
}

#[test]
fn failure_produces_no_output() {
    let decls = DeclTable::new().with_struct(
        "chreWwanBroken",
        [RawField::new("handle", TypeSpec::new("void").pointer())],
    );
    let annotations = AnnotationIndex::default();
    let result = Generator::new(&decls, &annotations)
        .generate(&GenerationRequest::new("wwan").root("chreWwanBroken"));

    assert_eq!(
        result.unwrap_err(),
        Error::UnannotatedPointer {
            type_name: "chreWwanBroken".into(),
            field: "handle".into(),
        }
    );
}

#[test]
fn program_carries_request() {
    let decls = sample_decls();
    let annotations = sample_annotations();
    let request = sample_request().include("chre_api/chre/wwan.h");
    assert_eq!(request.service(), "wwan");
    assert_eq!(request.includes(), ["chre_api/chre/wwan.h"]);

    let program = Generator::new(&decls, &annotations)
        .compile(&request)
        .unwrap();

    assert_eq!(program.service, "wwan");
    assert_eq!(program.roots, ["chreWwanSampleResult"]);
    assert_eq!(program.includes, ["chre_api/chre/wwan.h"]);
    assert_eq!(program.entry_points.len(), 1);
}

#[test]
fn repeated_roots_are_ignored() {
    let request = GenerationRequest::new("wwan")
        .root("chreWwanSampleResult")
        .roots(["chreWwanSampleResult"]);
    assert_eq!(request.root_names(), ["chreWwanSampleResult"]);

    let decls = sample_decls();
    let annotations = sample_annotations();
    let program = Generator::new(&decls, &annotations).compile(&request).unwrap();
    assert_eq!(program.entry_points.len(), 1);
    assert_eq!(program.encoders.len(), 1);
}

#[test]
fn config_is_applied() {
    let decls = sample_decls();
    let annotations = sample_annotations();
    let generator = Generator::new(&decls, &annotations)
        .with_config(Config::new().type_prefix("Wire").function_prefix("wire"));
    assert_eq!(generator.config().type_prefix, "Wire");
    assert_eq!(generator.config().api_prefix, "chre");

    let generated = generator.generate(&sample_request()).unwrap();
    assert!(generated.header.text().contains("#ifndef WIRE_WWAN_TYPES_H_\n"));
    assert!(generated.header.text().contains("struct WireWwanSampleResult {\n"));
    assert!(
        generated
            .conversion
            .text()
            .contains("static void wireWwanConvertSampleResultFromChre(\n")
    );
}

#[test]
fn resolver_can_be_a_trait_object() {
    let decls = sample_decls();
    let resolver: &dyn chppgen_core::Resolver = &decls;
    let annotations = sample_annotations();
    assert!(Generator::new(resolver, &annotations).compile(&sample_request()).is_ok());
}
