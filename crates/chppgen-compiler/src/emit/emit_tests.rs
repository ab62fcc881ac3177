use chppgen_core::{AnnotationIndex, DeclTable, Literal, RawField, TypeSpec};
use indoc::indoc;

use super::{render, render_conversion, render_header};
use crate::test_utils::{compile_sample, compile_wwan, field, var_len, variant};
use crate::{Config, GenerationRequest, Generator};

#[test]
fn wwan_header() {
    let header = render_header(&compile_wwan(), &Config::default());
    assert_eq!(header.name(), "wwan_types.h");
    insta::assert_snapshot!(header.text(), @r#"
    #ifndef CHPP_WWAN_TYPES_H_
    #define CHPP_WWAN_TYPES_H_

    // This file was automatically generated by chppgen
    // DO NOT modify this file directly, as those changes will be lost the next
    // time the generator is executed

    #include <stdbool.h>
    #include <stddef.h>
    #include <stdint.h>

    #include "chpp/macros.h"
    #include "chre_api/chre/version.h"
    #include "chre_api/chre/wwan.h"

    #ifdef __cplusplus
    extern "C" {
    #endif

    CHPP_PACKED_START

    //! See {@link chreWwanCellInfoGsm} for details
    struct ChppWwanCellInfoGsm {
      int32_t mcc;
      int32_t mnc;
    } CHPP_PACKED_ATTR;

    //! See {@link chreWwanCellInfoLte} for details
    struct ChppWwanCellInfoLte {
      int32_t pci;
      uint8_t reserved[2];  // Input ignored; always set to 0
    } CHPP_PACKED_ATTR;

    union ChppWwanCellInfoPerRat {
      struct ChppWwanCellInfoGsm gsm;
      struct ChppWwanCellInfoLte lte;
    } CHPP_PACKED_ATTR;

    //! See {@link chreWwanCellInfo} for details
    struct ChppWwanCellInfo {
      uint64_t timeStamp;
      uint8_t cellInfoType;
      uint8_t timeStampType;
      uint8_t registered;
      uint8_t reserved;  // Input ignored; always set to 0
      union ChppWwanCellInfoPerRat CellInfo;
    } CHPP_PACKED_ATTR;

    //! See {@link chreWwanCellInfoResult} for details
    struct ChppWwanCellInfoResult {
      uint8_t version;  // Input ignored; always set to CHRE_WWAN_CELL_INFO_RESULT_VERSION
      uint8_t errorCode;
      uint8_t cellInfoCount;
      uint8_t reserved;  // Input ignored; always set to 0
      uint32_t cookie;
      struct ChppOffset cells;  // References cellInfoCount instances of struct ChppWwanCellInfo
    } CHPP_PACKED_ATTR;

    CHPP_PACKED_END

    // Encoding functions (CHRE --> CHPP)

    /**
     * Converts from given CHRE structure to serialized CHPP type
     *
     * @param in Fully-formed CHRE structure
     * @param out Upon success, will point to a buffer allocated with chppMalloc().
     * It is the responsibility of the caller to free this buffer via chppFree().
     * @param outSize Upon success, will be set to the size of the output buffer,
     * in bytes
     * @return true on success, false if memory allocation failed
     */
    bool chppWwanCellInfoResultFromChre(
        const struct chreWwanCellInfoResult *in,
        struct ChppWwanCellInfoResult **out,
        size_t *outSize);

    #ifdef __cplusplus
    }
    #endif

    #endif  // CHPP_WWAN_TYPES_H_
    "#);
}

#[test]
fn wwan_conversion() {
    let conversion = render_conversion(&compile_wwan(), &Config::default());
    assert_eq!(conversion.name(), "wwan_convert.c");
    insta::assert_snapshot!(conversion.text(), @r#"
    // This file was automatically generated by chppgen
    // DO NOT modify this file directly, as those changes will be lost the next
    // time the generator is executed

    #include "chpp/macros.h"
    #include "chpp/memory.h"
    #include "chpp/services/wwan_types.h"

    #include <stddef.h>
    #include <stdint.h>
    #include <string.h>

    //! @return number of bytes required to represent the given
    //! chreWwanCellInfoResult as struct ChppWwanCellInfoResult
    static size_t chppWwanSizeOfCellInfoResultFromChre(
        const struct chreWwanCellInfoResult *cellInfoResult) {
      size_t encodedSize = sizeof(struct ChppWwanCellInfoResult);
      encodedSize += cellInfoResult->cellInfoCount * sizeof(struct ChppWwanCellInfo);
      return encodedSize;
    }

    static void chppWwanConvertCellInfoGsmFromChre(
        const struct chreWwanCellInfoGsm *in,
        struct ChppWwanCellInfoGsm *out) {
      out->mcc = in->mcc;
      out->mnc = in->mnc;
    }

    static void chppWwanConvertCellInfoLteFromChre(
        const struct chreWwanCellInfoLte *in,
        struct ChppWwanCellInfoLte *out) {
      out->pci = in->pci;
      memset(&out->reserved, 0, sizeof(out->reserved));
    }

    static void chppWwanConvertCellInfoFromChre(
        const struct chreWwanCellInfo *in,
        struct ChppWwanCellInfo *out) {
      out->timeStamp = in->timeStamp;
      out->cellInfoType = in->cellInfoType;
      out->timeStampType = in->timeStampType;
      out->registered = in->registered;
      out->reserved = 0;

      memset(&out->CellInfo, 0, sizeof(out->CellInfo));
      switch (in->cellInfoType) {
        case CHRE_WWAN_CELL_INFO_TYPE_GSM:
          chppWwanConvertCellInfoGsmFromChre(&in->CellInfo.gsm, &out->CellInfo.gsm);
          break;
        case CHRE_WWAN_CELL_INFO_TYPE_LTE:
          chppWwanConvertCellInfoLteFromChre(&in->CellInfo.lte, &out->CellInfo.lte);
          break;
        default:
          CHPP_ASSERT(false);
      }
    }

    static void chppWwanConvertCellInfoResultFromChre(
        const struct chreWwanCellInfoResult *in,
        struct ChppWwanCellInfoResult *out,
        uint8_t *payload,
        size_t payloadSize,
        uint16_t *vlaOffset) {
      out->version = CHRE_WWAN_CELL_INFO_RESULT_VERSION;
      out->errorCode = in->errorCode;
      out->cellInfoCount = in->cellInfoCount;
      out->reserved = 0;
      out->cookie = in->cookie;

      struct ChppWwanCellInfo *cells = (struct ChppWwanCellInfo *) &payload[*vlaOffset];
      out->cells.length = in->cellInfoCount * sizeof(struct ChppWwanCellInfo);
      if (out->cells.length > 0 &&
          *vlaOffset + out->cells.length <= payloadSize) {
        out->cells.offset = *vlaOffset;
        *vlaOffset += out->cells.length;
        for (size_t i = 0; i < in->cellInfoCount; i++) {
          chppWwanConvertCellInfoFromChre(&in->cells[i], &cells[i]);
        }
      } else {
        out->cells.offset = 0;
        out->cells.length = 0;
      }
    }

    bool chppWwanCellInfoResultFromChre(
        const struct chreWwanCellInfoResult *in,
        struct ChppWwanCellInfoResult **out,
        size_t *outSize) {
      CHPP_NOT_NULL(out);
      CHPP_NOT_NULL(outSize);

      size_t payloadSize = chppWwanSizeOfCellInfoResultFromChre(in);
      struct ChppWwanCellInfoResult *encoded = chppMalloc(payloadSize);
      if (encoded == NULL) {
        return false;
      }

      uint8_t *payload = (uint8_t *) encoded;
      uint16_t vlaOffset = sizeof(struct ChppWwanCellInfoResult);
      chppWwanConvertCellInfoResultFromChre(in, encoded, payload, payloadSize, &vlaOffset);

      *out = encoded;
      *outSize = payloadSize;
      return true;
    }
    "#);
}

#[test]
fn scalar_var_len_array() {
    let text = render_conversion(&compile_sample(), &Config::default()).text();
    assert!(text.contains(concat!(
        "  uint32_t *values = (uint32_t *) &payload[*vlaOffset];\n",
        "  out->values.length = in->count * sizeof(uint32_t);\n",
    )));
    assert!(text.contains("      values[i] = in->values[i];\n"));
    assert!(text.contains("  encodedSize += sampleResult->count * sizeof(uint32_t);\n"));
}

#[test]
fn const_elements_are_written_through_unqualified_types() {
    let decls = DeclTable::new().with_struct(
        "chreWifiScanEvent",
        [
            field("version", "const uint8_t"),
            field("count", "uint8_t"),
            RawField::new("freqs", TypeSpec::new("const uint32_t").pointer()),
        ],
    );
    let annotations = AnnotationIndex::new([var_len("chreWifiScanEvent", "freqs", "count")]);
    let program = Generator::new(&decls, &annotations)
        .compile(&GenerationRequest::new("wifi").root("chreWifiScanEvent"))
        .unwrap();
    let generated = render(&program, &Config::default());
    let header = generated.header.text();
    let conversion = generated.conversion.text();

    assert!(header.contains("  uint8_t version;\n"));
    assert!(header.contains("  struct ChppOffset freqs;  // References count instances of uint32_t\n"));
    assert!(conversion.contains("  encodedSize += scanEvent->count * sizeof(uint32_t);\n"));
    assert!(conversion.contains(concat!(
        "  uint32_t *freqs = (uint32_t *) &payload[*vlaOffset];\n",
        "  out->freqs.length = in->count * sizeof(uint32_t);\n",
    )));
    assert!(conversion.contains("      freqs[i] = in->freqs[i];\n"));
    assert!(conversion.contains("  out->version = in->version;\n"));
    assert!(!header.contains("const uint"));
    assert!(!conversion.contains("const uint"));
}

#[test]
fn fixed_size_entry_point() {
    let decls = DeclTable::new().with_struct(
        "chreTestFixed",
        [field("a", "uint32_t"), field("b", "uint8_t")],
    );
    let annotations = AnnotationIndex::default();
    let program = Generator::new(&decls, &annotations)
        .compile(&GenerationRequest::new("test").root("chreTestFixed"))
        .unwrap();
    let text = render_conversion(&program, &Config::default()).text();

    assert!(!text.contains("SizeOf"));
    assert!(text.ends_with(indoc! {"
        bool chppTestFixedFromChre(
            const struct chreTestFixed *in,
            struct ChppTestFixed **out,
            size_t *outSize) {
          CHPP_NOT_NULL(out);
          CHPP_NOT_NULL(outSize);

          size_t payloadSize = sizeof(struct ChppTestFixed);
          struct ChppTestFixed *encoded = chppMalloc(payloadSize);
          if (encoded == NULL) {
            return false;
          }

          chppTestConvertFixedFromChre(in, encoded);

          *out = encoded;
          *outSize = payloadSize;
          return true;
        }
    "}));
}

#[test]
fn unmapped_discriminator_asserts_at_runtime() {
    let decls = DeclTable::new()
        .with_struct(
            "chreTestRoot",
            [field("kind", "uint8_t"), field("value", "union chreTestValue")],
        )
        .with_union(
            "chreTestValue",
            [field("a", "uint32_t"), field("b", "uint8_t")],
        );
    let annotations = AnnotationIndex::new([variant(
        "chreTestRoot",
        "value",
        "kind",
        &[(Literal::Int(1), "a"), (Literal::Int(2), "b")],
    )]);
    let program = Generator::new(&decls, &annotations)
        .compile(&GenerationRequest::new("test").root("chreTestRoot"))
        .unwrap();
    let text = render_conversion(&program, &Config::default()).text();

    assert!(text.contains(concat!(
        "  memset(&out->value, 0, sizeof(out->value));\n",
        "  switch (in->kind) {\n",
        "    case 1:\n",
        "      out->value.a = in->value.a;\n",
        "      break;\n",
        "    case 2:\n",
        "      out->value.b = in->value.b;\n",
        "      break;\n",
        "    default:\n",
        "      CHPP_ASSERT(false);\n",
        "  }\n",
    )));
}

#[test]
fn nested_size_and_record_arrays() {
    use chppgen_core::{RawField, TypeSpec};

    use crate::test_utils::var_len;

    let decls = DeclTable::new()
        .with_struct(
            "chreTestOuter",
            [
                field("inner", "struct chreTestInner"),
                RawField::new("points", TypeSpec::new("struct chreTestPoint").array(3)),
            ],
        )
        .with_struct(
            "chreTestInner",
            [
                field("count", "uint8_t"),
                RawField::new("items", TypeSpec::new("int16_t").pointer()),
            ],
        )
        .with_struct("chreTestPoint", [field("x", "int16_t")]);
    let annotations = AnnotationIndex::new([var_len("chreTestInner", "items", "count")]);
    let program = Generator::new(&decls, &annotations)
        .compile(&GenerationRequest::new("test").root("chreTestOuter"))
        .unwrap();
    let text = render_conversion(&program, &Config::default()).text();

    assert!(text.contains(
        "  encodedSize += chppTestSizeOfInnerFromChre(&outer->inner) - sizeof(struct ChppTestInner);\n"
    ));
    assert!(text.contains(
        "  chppTestConvertInnerFromChre(&in->inner, &out->inner, payload, payloadSize, vlaOffset);\n"
    ));
    assert!(text.contains(concat!(
        "  for (size_t j = 0; j < 3; j++) {\n",
        "    chppTestConvertPointFromChre(&in->points[j], &out->points[j]);\n",
        "  }\n",
    )));
}

#[test]
fn license_and_project_includes() {
    let program = compile_wwan();
    let config = Config::new()
        .license("/* Licensed under the Apache License, Version 2.0 */")
        .header_includes(["zeta/last.h", "chre_api/chre/wwan.h", "alpha/first.h"])
        .generator("chppgen-test");
    let generated = render(&program, &config);

    let header = generated.header.text();
    assert!(header.starts_with(indoc! {"
        /* Licensed under the Apache License, Version 2.0 */
        #ifndef CHPP_WWAN_TYPES_H_
    "}));
    assert!(header.contains(indoc! {r#"
        #include "alpha/first.h"
        #include "chre_api/chre/wwan.h"
        #include "zeta/last.h"

    "#}));
    assert!(header.contains("// This file was automatically generated by chppgen-test\n"));

    let conversion = generated.conversion.text();
    assert!(conversion.starts_with(
        "/* Licensed under the Apache License, Version 2.0 */\n\n// This file was automatically generated"
    ));
}

#[test]
fn custom_offset_type() {
    let text = render_header(&compile_sample(), &Config::new().offset_type("struct WireRange")).text();
    assert!(text.contains("  struct WireRange values;  // References count instances of uint32_t\n"));
}

#[test]
fn fragments_concatenate_to_text() {
    let header = render_header(&compile_sample(), &Config::default());
    assert!(header.fragments().len() > 5);
    assert_eq!(header.fragments().concat(), header.text());
}
