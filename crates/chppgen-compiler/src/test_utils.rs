//! Test fixtures modeled on the CHRE WWAN API.

use chppgen_core::{
    Annotation, AnnotationIndex, AnnotationRecord, DeclTable, Literal, RawField, TypeSpec,
};
use chppgen_ir::Program;

use crate::{Generator, GenerationRequest};

pub fn field(name: &str, ty: &str) -> RawField {
    RawField::new(name, TypeSpec::new(ty))
}

pub fn fixed(type_name: &str, field: &str, value: impl Into<Literal>) -> AnnotationRecord {
    AnnotationRecord::field(
        type_name,
        field,
        Annotation::FixedValue {
            value: value.into(),
        },
    )
}

pub fn var_len(type_name: &str, field: &str, length_field: &str) -> AnnotationRecord {
    AnnotationRecord::field(
        type_name,
        field,
        Annotation::VarLenArray {
            length_field: length_field.to_owned(),
        },
    )
}

pub fn rewrite(type_name: &str, field: &str, type_override: &str) -> AnnotationRecord {
    AnnotationRecord::field(
        type_name,
        field,
        Annotation::RewriteType {
            type_override: type_override.to_owned(),
        },
    )
}

pub fn variant(
    type_name: &str,
    field: &str,
    discriminator: &str,
    mapping: &[(Literal, &str)],
) -> AnnotationRecord {
    AnnotationRecord::field(
        type_name,
        field,
        Annotation::UnionVariant {
            discriminator: discriminator.to_owned(),
            mapping: mapping
                .iter()
                .map(|(value, member)| (value.clone(), (*member).to_owned()))
                .collect(),
        },
    )
}

pub fn rename(type_name: &str, type_override: &str) -> AnnotationRecord {
    AnnotationRecord::type_level(
        type_name,
        Annotation::RenameType {
            type_override: type_override.to_owned(),
        },
    )
}

/// Cell info result with a variable-length list of cells, each carrying an
/// anonymous per-RAT union.
pub fn wwan_decls() -> DeclTable {
    DeclTable::new()
        .with_struct(
            "chreWwanCellInfoResult",
            [
                field("version", "uint8_t"),
                field("errorCode", "uint8_t"),
                field("cellInfoCount", "uint8_t"),
                field("reserved", "uint8_t"),
                RawField::new("cookie", TypeSpec::new("const void").pointer()),
                RawField::new("cells", TypeSpec::new("const struct chreWwanCellInfo").pointer()),
            ],
        )
        .with_struct(
            "chreWwanCellInfo",
            [
                field("timeStamp", "uint64_t"),
                field("cellInfoType", "uint8_t"),
                field("timeStampType", "uint8_t"),
                field("registered", "uint8_t"),
                field("reserved", "uint8_t"),
                field("CellInfo", "union anon7"),
            ],
        )
        .with_union(
            "anon7",
            [
                field("gsm", "struct chreWwanCellInfoGsm"),
                field("lte", "struct chreWwanCellInfoLte"),
            ],
        )
        .with_struct(
            "chreWwanCellInfoGsm",
            [field("mcc", "int32_t"), field("mnc", "int32_t")],
        )
        .with_struct(
            "chreWwanCellInfoLte",
            [
                field("pci", "int32_t"),
                RawField::new("reserved", TypeSpec::new("uint8_t").array(2)),
            ],
        )
}

pub fn wwan_annotations() -> AnnotationIndex {
    AnnotationIndex::new([
        fixed("chreWwanCellInfoResult", "version", "CHRE_WWAN_CELL_INFO_RESULT_VERSION"),
        fixed("chreWwanCellInfoResult", "reserved", 0i64),
        rewrite("chreWwanCellInfoResult", "cookie", "uint32_t"),
        var_len("chreWwanCellInfoResult", "cells", "cellInfoCount"),
        fixed("chreWwanCellInfo", "reserved", 0i64),
        variant(
            "chreWwanCellInfo",
            "CellInfo",
            "cellInfoType",
            &[
                (Literal::from("CHRE_WWAN_CELL_INFO_TYPE_GSM"), "gsm"),
                (Literal::from("CHRE_WWAN_CELL_INFO_TYPE_LTE"), "lte"),
            ],
        ),
        rename("anon7", "ChppWwanCellInfoPerRat"),
        fixed("chreWwanCellInfoLte", "reserved", 0i64),
    ])
}

pub fn wwan_request() -> GenerationRequest {
    GenerationRequest::new("wwan")
        .root("chreWwanCellInfoResult")
        .include("chre_api/chre/wwan.h")
}

/// Root with one fixed field and a `count`-sized list of `uint32_t`.
pub fn sample_decls() -> DeclTable {
    DeclTable::new().with_struct(
        "chreWwanSampleResult",
        [
            field("version", "uint32_t"),
            field("count", "uint32_t"),
            RawField::new("values", TypeSpec::new("uint32_t").pointer()),
        ],
    )
}

pub fn sample_annotations() -> AnnotationIndex {
    AnnotationIndex::new([var_len("chreWwanSampleResult", "values", "count")])
}

pub fn sample_request() -> GenerationRequest {
    GenerationRequest::new("wwan").root("chreWwanSampleResult")
}

pub fn compile_wwan() -> Program {
    let decls = wwan_decls();
    let annotations = wwan_annotations();
    Generator::new(&decls, &annotations)
        .compile(&wwan_request())
        .unwrap()
}

pub fn compile_sample() -> Program {
    let decls = sample_decls();
    let annotations = sample_annotations();
    Generator::new(&decls, &annotations)
        .compile(&sample_request())
        .unwrap()
}
