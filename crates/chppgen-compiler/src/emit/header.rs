//! Declarations document (`<service>_types.h`).

use chppgen_core::utils::to_screaming_snake_case;
use chppgen_ir::{MemberDecl, MemberRepr, Program, TypeDecl};
use tracing::debug;

use super::{Artifact, entry_signature, license, notice};
use crate::Config;

const ENTRY_DOCS: &str = "\
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
";

pub fn render_header(program: &Program, config: &Config) -> Artifact {
    let mut artifact = Artifact::new(format!("{}_types.h", program.service));
    let guard = format!(
        "{}_{}_TYPES_H_",
        config.type_prefix.to_uppercase(),
        to_screaming_snake_case(&program.service)
    );

    if let Some(license) = license(config) {
        artifact.push(license);
    }
    artifact.push(format!("#ifndef {guard}\n#define {guard}\n\n"));
    artifact.push(notice(config));
    artifact.push(includes(program, config));
    artifact.push("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n".to_owned());

    artifact.push("CHPP_PACKED_START\n\n".to_owned());
    for decl in &program.decls {
        artifact.push(declaration(decl, config));
    }
    artifact.push("CHPP_PACKED_END\n\n".to_owned());

    artifact.push("// Encoding functions (CHRE --> CHPP)\n\n".to_owned());
    for entry in &program.entry_points {
        artifact.push(format!("{ENTRY_DOCS}{};\n\n", entry_signature(entry)));
    }

    artifact.push("#ifdef __cplusplus\n}\n#endif\n\n".to_owned());
    artifact.push(format!("#endif  // {guard}\n"));

    debug!(name = artifact.name(), decls = program.decls.len(), "rendered declarations");
    artifact
}

fn includes(program: &Program, config: &Config) -> String {
    let mut project: Vec<&str> = config
        .header_includes
        .iter()
        .chain(&program.includes)
        .map(String::as_str)
        .collect();
    project.sort_unstable();
    project.dedup();

    let mut out = String::from("#include <stdbool.h>\n#include <stddef.h>\n#include <stdint.h>\n\n");
    for include in project {
        out.push_str(&format!("#include \"{include}\"\n"));
    }
    out.push('\n');
    out
}

fn declaration(decl: &TypeDecl, config: &Config) -> String {
    let mut out = String::new();
    if !decl.is_anonymous() {
        out.push_str(&format!("//! See {{@link {}}} for details\n", decl.source));
    }
    out.push_str(&format!("{} {{\n", decl.target));
    for member in &decl.members {
        out.push_str(&member_line(member, config));
    }
    out.push_str("} CHPP_PACKED_ATTR;\n\n");
    out
}

fn member_line(member: &MemberDecl, config: &Config) -> String {
    let ty = match &member.repr {
        MemberRepr::Value(repr) => repr.c_type(),
        MemberRepr::Descriptor { .. } => config.offset_type.as_str(),
    };
    let suffix = member
        .array_len
        .map(|len| format!("[{len}]"))
        .unwrap_or_default();
    let comment = member
        .comment
        .as_deref()
        .map(|c| format!("  // {c}"))
        .unwrap_or_default();
    format!("  {ty} {}{suffix};{comment}\n", member.name)
}
