//! Conversion document (`<service>_convert.c`).

use chppgen_ir::{Assign, EncodeFn, EntryPoint, Program, SizeCall, SizeFn, SizeTerm, Step};
use tracing::debug;

use super::{Artifact, entry_signature, license, notice, source_type};
use crate::Config;

const PAYLOAD_PARAMS: &str = ",\n    uint8_t *payload,\n    size_t payloadSize,\n    uint16_t *vlaOffset";
const PAYLOAD_ARGS: &str = ", payload, payloadSize, vlaOffset";

pub fn render_conversion(program: &Program, config: &Config) -> Artifact {
    let mut artifact = Artifact::new(format!("{}_convert.c", program.service));

    if let Some(license) = license(config) {
        artifact.push(format!("{license}\n"));
    }
    artifact.push(notice(config));
    artifact.push(format!(
        "#include \"chpp/macros.h\"\n\
         #include \"chpp/memory.h\"\n\
         #include \"chpp/services/{}_types.h\"\n\n\
         #include <stddef.h>\n\
         #include <stdint.h>\n\
         #include <string.h>\n\n",
        program.service
    ));

    for size_fn in &program.size_fns {
        artifact.push(size_function(size_fn));
    }
    for encoder in &program.encoders {
        artifact.push(encode_function(encoder));
    }
    for (i, entry) in program.entry_points.iter().enumerate() {
        let separator = if i == 0 { "" } else { "\n" };
        artifact.push(format!("{separator}{}", entry_point(entry)));
    }

    debug!(
        name = artifact.name(),
        size_fns = program.size_fns.len(),
        encoders = program.encoders.len(),
        "rendered conversions"
    );
    artifact
}

fn size_function(f: &SizeFn) -> String {
    let p = &f.param;
    let mut out = String::new();
    out.push_str(&format!(
        "//! @return number of bytes required to represent the given\n//! {} as {}\n",
        f.source, f.target
    ));
    out.push_str(&format!(
        "static size_t {}(\n    const {} *{p}) {{\n",
        f.function,
        source_type(&f.source)
    ));
    out.push_str(&format!("  size_t encodedSize = sizeof({});\n", f.target));
    for term in &f.terms {
        match term {
            SizeTerm::VarLen {
                length_field,
                element,
                ..
            } => out.push_str(&format!(
                "  encodedSize += {p}->{length_field} * sizeof({});\n",
                element.c_type()
            )),
            SizeTerm::Nested {
                field,
                target,
                function,
                ..
            } => out.push_str(&format!(
                "  encodedSize += {function}(&{p}->{field}) - sizeof({target});\n"
            )),
        }
    }
    out.push_str("  return encodedSize;\n}\n\n");
    out
}

fn encode_function(f: &EncodeFn) -> String {
    let mut out = String::new();
    out.push_str(&format!("static void {}(\n", f.function));
    out.push_str(&format!("    const {} *in,\n", source_type(&f.source)));
    out.push_str(&format!("    {} *out", f.target));
    if f.var_len {
        out.push_str(PAYLOAD_PARAMS);
    }
    out.push_str(") {\n");

    // Multi-line blocks are set off by blank lines.
    let mut previous_block = false;
    for (i, step) in f.steps.iter().enumerate() {
        let text = step_text(step);
        let block = text.lines().count() > 1;
        if i > 0 && (block || previous_block) {
            out.push('\n');
        }
        out.push_str(&text);
        previous_block = block;
    }
    out.push_str("}\n\n");
    out
}

fn step_text(step: &Step) -> String {
    let mut out = String::new();
    match step {
        Step::FixedScalar { field, value } => {
            out.push_str(&format!("  out->{field} = {value};\n"));
        }
        Step::FixedFill { field, value } => {
            out.push_str(&format!(
                "  memset(&out->{field}, {value}, sizeof(out->{field}));\n"
            ));
        }
        Step::Assign { field, assign } => {
            push_assign(
                &mut out,
                assign,
                &format!("in->{field}"),
                &format!("out->{field}"),
                "  ",
            );
        }
        Step::VarLen {
            field,
            length_field,
            element,
            assign,
        } => {
            let ty = element.c_type();
            out.push_str(&format!("  {ty} *{field} = ({ty} *) &payload[*vlaOffset];\n"));
            out.push_str(&format!(
                "  out->{field}.length = in->{length_field} * sizeof({ty});\n"
            ));
            out.push_str(&format!(
                "  if (out->{field}.length > 0 &&\n      *vlaOffset + out->{field}.length <= payloadSize) {{\n"
            ));
            out.push_str(&format!("    out->{field}.offset = *vlaOffset;\n"));
            out.push_str(&format!("    *vlaOffset += out->{field}.length;\n"));
            out.push_str(&format!(
                "    for (size_t i = 0; i < in->{length_field}; i++) {{\n"
            ));
            push_assign(
                &mut out,
                assign,
                &format!("in->{field}[i]"),
                &format!("{field}[i]"),
                "      ",
            );
            out.push_str("    }\n  } else {\n");
            out.push_str(&format!("    out->{field}.offset = 0;\n"));
            out.push_str(&format!("    out->{field}.length = 0;\n"));
            out.push_str("  }\n");
        }
        Step::Union {
            field,
            discriminator,
            arms,
            ..
        } => {
            out.push_str(&format!(
                "  memset(&out->{field}, 0, sizeof(out->{field}));\n"
            ));
            out.push_str(&format!("  switch (in->{discriminator}) {{\n"));
            for arm in arms {
                out.push_str(&format!("    case {}:\n", arm.value));
                push_assign(
                    &mut out,
                    &arm.assign,
                    &format!("in->{field}.{}", arm.member),
                    &format!("out->{field}.{}", arm.member),
                    "      ",
                );
                out.push_str("      break;\n");
            }
            out.push_str("    default:\n      CHPP_ASSERT(false);\n  }\n");
        }
    }
    out
}

fn push_assign(out: &mut String, assign: &Assign, src: &str, dst: &str, indent: &str) {
    match assign {
        Assign::Scalar => out.push_str(&format!("{indent}{dst} = {src};\n")),
        Assign::Array(_) => {
            out.push_str(&format!("{indent}memcpy({dst}, {src}, sizeof({dst}));\n"));
        }
        Assign::Record {
            function, var_len, ..
        } => {
            let args = if *var_len { PAYLOAD_ARGS } else { "" };
            out.push_str(&format!("{indent}{function}(&{src}, &{dst}{args});\n"));
        }
        Assign::RecordArray { function, len, .. } => {
            out.push_str(&format!("{indent}for (size_t j = 0; j < {len}; j++) {{\n"));
            out.push_str(&format!("{indent}  {function}(&{src}[j], &{dst}[j]);\n"));
            out.push_str(&format!("{indent}}}\n"));
        }
    }
}

fn entry_point(entry: &EntryPoint) -> String {
    let target = &entry.target;
    let mut out = entry_signature(entry);
    out.push_str(" {\n");
    out.push_str("  CHPP_NOT_NULL(out);\n  CHPP_NOT_NULL(outSize);\n\n");

    let size = match &entry.size {
        SizeCall::Static => format!("sizeof({target})"),
        SizeCall::Dynamic(function) => format!("{function}(in)"),
    };
    out.push_str(&format!("  size_t payloadSize = {size};\n"));
    out.push_str(&format!("  {target} *encoded = chppMalloc(payloadSize);\n"));
    out.push_str("  if (encoded == NULL) {\n    return false;\n  }\n\n");

    if entry.var_len {
        out.push_str("  uint8_t *payload = (uint8_t *) encoded;\n");
        out.push_str(&format!("  uint16_t vlaOffset = sizeof({target});\n"));
        out.push_str(&format!(
            "  {}(in, encoded, payload, payloadSize, &vlaOffset);\n\n",
            entry.encoder
        ));
    } else {
        out.push_str(&format!("  {}(in, encoded);\n\n", entry.encoder));
    }

    out.push_str("  *out = encoded;\n  *outSize = payloadSize;\n  return true;\n}\n");
    out
}
