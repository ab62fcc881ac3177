//! Execution of size functions, encoders and entry points.

use std::collections::HashMap;

use chppgen_core::Literal;
use chppgen_ir::{
    Assign, EncodeFn, EntryPoint, FieldLayout, LayoutError, LayoutTable, PrimitiveTable, Program,
    ScalarClass, SizeCall, SizeTerm, Step, TypeLayout,
};
use tracing::{debug, instrument};

use crate::error::{Result, RuntimeError};
use crate::value::Value;

/// Resource limits for entry point execution.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Largest allocation that succeeds (default: 65,535 bytes).
    pub(crate) max_allocation: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_allocation: u16::MAX as usize,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allocation limit. Larger requests fail like a `NULL` from the allocator.
    pub fn max_allocation(mut self, bytes: usize) -> Self {
        self.max_allocation = bytes;
        self
    }

    pub fn get_max_allocation(&self) -> usize {
        self.max_allocation
    }
}

/// Output buffer and the payload cursor shared by every encoder of one run.
struct Output<'b> {
    buf: &'b mut [u8],
    vla_offset: u16,
}

/// Interpreter for a compiled [`Program`].
pub struct Encoder<'p> {
    program: &'p Program,
    layouts: LayoutTable,
    constants: HashMap<String, i64>,
    limits: Limits,
}

impl<'p> Encoder<'p> {
    pub fn new(
        program: &'p Program,
        primitives: &PrimitiveTable,
    ) -> std::result::Result<Self, LayoutError> {
        Ok(Self {
            program,
            layouts: LayoutTable::compute(program, primitives)?,
            constants: HashMap::new(),
            limits: Limits::default(),
        })
    }

    /// Define a symbolic constant used by fixed values or variant mappings.
    pub fn with_constant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    /// Bytes the entry point for `root` allocates for `value`.
    pub fn encoded_size(&self, root: &str, value: &Value) -> Result<usize> {
        let entry = self.entry(root)?;
        match &entry.size {
            SizeCall::Static => self.static_size(&entry.source),
            SizeCall::Dynamic(_) => self.dynamic_size(&entry.source, Some(value)),
        }
    }

    /// Run the entry point for `root`: size, allocate, encode.
    #[instrument(skip(self, value))]
    pub fn encode(&self, root: &str, value: &Value) -> Result<Vec<u8>> {
        let size = self.encoded_size(root, value)?;
        if size > self.limits.max_allocation {
            return Err(RuntimeError::AllocationFailed { size });
        }
        let mut buf = vec![0; size];
        self.encode_into(root, value, &mut buf)?;
        debug!(size, "encoded");
        Ok(buf)
    }

    /// Encode `value` into `buf`, whose length is the payload capacity.
    ///
    /// Payload offsets are 16-bit, so only the first 65,535 bytes of `buf`
    /// can hold payload. Bytes the encoders do not write are left untouched.
    /// Returns the end of the written region: the static size plus the
    /// payload consumed.
    pub fn encode_into(&self, root: &str, value: &Value, buf: &mut [u8]) -> Result<usize> {
        let entry = self.entry(root)?;
        let needed = self.static_size(&entry.source)?;
        if buf.len() < needed {
            return Err(RuntimeError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        let encoder = self.encoder(&entry.source)?;
        // A static part past the 16-bit range leaves no room for payload.
        let mut out = Output {
            buf,
            vla_offset: u16::try_from(needed).unwrap_or(u16::MAX),
        };
        self.run(encoder, Some(value), 0, &mut out)?;

        if entry.var_len {
            Ok(usize::from(out.vla_offset).max(needed))
        } else {
            Ok(needed)
        }
    }

    fn entry(&self, root: &str) -> Result<&'p EntryPoint> {
        self.program
            .entry_point(root)
            .ok_or_else(|| RuntimeError::UnknownRoot(root.to_owned()))
    }

    fn encoder(&self, source: &str) -> Result<&'p EncodeFn> {
        self.program
            .encoder(source)
            .ok_or_else(|| RuntimeError::MissingDefinition(source.to_owned()))
    }

    fn layout(&self, source: &str) -> Result<&TypeLayout> {
        self.layouts
            .get(source)
            .ok_or_else(|| RuntimeError::MissingDefinition(source.to_owned()))
    }

    fn field_layout(&self, source: &str, field: &str) -> Result<FieldLayout> {
        self.layout(source)?
            .field(field)
            .copied()
            .ok_or_else(|| RuntimeError::MissingDefinition(format!("{source}.{field}")))
    }

    fn static_size(&self, source: &str) -> Result<usize> {
        self.layout(source).map(|layout| layout.size)
    }

    fn dynamic_size(&self, source: &str, value: Option<&Value>) -> Result<usize> {
        let mut size = self.static_size(source)?;
        let Some(size_fn) = self.program.size_fn(source) else {
            return Ok(size);
        };

        for term in &size_fn.terms {
            match term {
                SizeTerm::VarLen {
                    field,
                    length_field,
                    ..
                } => {
                    let element_size = self.field_layout(source, field)?.element_size;
                    let count = length(value, length_field)?;
                    size = size.saturating_add(count.saturating_mul(element_size));
                }
                SizeTerm::Nested {
                    field,
                    source: nested,
                    ..
                } => {
                    let total = self.dynamic_size(nested, member(value, field))?;
                    size = size.saturating_add(total - self.static_size(nested)?);
                }
            }
        }
        Ok(size)
    }

    /// Encode `input` as `encoder.source` at `at`.
    fn run(
        &self,
        encoder: &EncodeFn,
        input: Option<&Value>,
        at: usize,
        out: &mut Output<'_>,
    ) -> Result<()> {
        if let Some(value) = input
            && !matches!(value, Value::Record(_))
        {
            return Err(RuntimeError::TypeMismatch {
                field: encoder.source.clone(),
                expected: "a record",
            });
        }

        for step in &encoder.steps {
            let layout = self.field_layout(&encoder.source, step.field())?;
            let at = at + layout.offset;
            match step {
                Step::FixedScalar { field, value } => {
                    let value = Value::Int(self.literal(value)?);
                    let end = at + layout.element_size;
                    write_scalar(&mut out.buf[at..end], layout.scalar, Some(&value), field)?;
                }
                Step::FixedFill { value, .. } => {
                    // memset semantics: only the low byte counts
                    let byte = self.literal(value)? as u8;
                    out.buf[at..at + layout.size].fill(byte);
                }
                Step::Assign { field, assign } => {
                    self.assign(assign, field, member(input, field), at, &layout, out)?;
                }
                Step::VarLen {
                    field,
                    length_field,
                    assign,
                    ..
                } => {
                    let count = length(input, length_field)?;
                    self.var_len(field, count, assign, member(input, field), at, &layout, out)?;
                }
                Step::Union {
                    field,
                    union,
                    discriminator,
                    arms,
                } => {
                    out.buf[at..at + layout.size].fill(0);

                    let selector = int(member(input, discriminator), discriminator)?;
                    let mut selected = None;
                    for arm in arms {
                        if self.literal(&arm.value)? == selector {
                            selected = Some(arm);
                            break;
                        }
                    }
                    let arm = selected.ok_or_else(|| RuntimeError::UnmappedDiscriminator {
                        field: field.clone(),
                        value: selector,
                    })?;

                    let variant = self.field_layout(&union.source, &arm.member)?;
                    let payload = member(input, field);
                    self.assign(
                        &arm.assign,
                        &arm.member,
                        member(payload, &arm.member),
                        at + variant.offset,
                        &variant,
                        out,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Copy `count` elements into the payload region and describe them at `at`.
    ///
    /// A zero length, or one that does not fit the payload or the 16-bit
    /// offset range, leaves a zero descriptor and copies nothing.
    #[allow(clippy::too_many_arguments)]
    fn var_len(
        &self,
        field: &str,
        count: usize,
        assign: &Assign,
        items: Option<&Value>,
        at: usize,
        layout: &FieldLayout,
        out: &mut Output<'_>,
    ) -> Result<()> {
        let start = usize::from(out.vla_offset);
        let capacity = out.buf.len().min(usize::from(u16::MAX));
        let length = count
            .checked_mul(layout.element_size)
            .and_then(|length| u16::try_from(length).ok())
            .filter(|&length| length > 0 && start + usize::from(length) <= capacity);

        let Some(length) = length else {
            write_u16(out.buf, at, 0);
            write_u16(out.buf, at + 2, 0);
            return Ok(());
        };

        write_u16(out.buf, at, out.vla_offset);
        write_u16(out.buf, at + 2, length);
        out.vla_offset += length;
        debug!(field, offset = start, length, "payload reserved");

        let element = FieldLayout {
            offset: 0,
            size: layout.element_size,
            element_size: layout.element_size,
            count: 1,
            scalar: layout.scalar,
        };
        for i in 0..count {
            let item = items.and_then(|items| items.index(i));
            self.assign(assign, field, item, start + i * layout.element_size, &element, out)?;
        }
        Ok(())
    }

    fn assign(
        &self,
        assign: &Assign,
        field: &str,
        value: Option<&Value>,
        at: usize,
        layout: &FieldLayout,
        out: &mut Output<'_>,
    ) -> Result<()> {
        let size = layout.element_size;
        match assign {
            Assign::Scalar => write_scalar(&mut out.buf[at..at + size], layout.scalar, value, field),
            Assign::Array(len) => {
                for i in 0..*len {
                    let item = value.and_then(|v| v.index(i));
                    let slot = at + i * size;
                    write_scalar(&mut out.buf[slot..slot + size], layout.scalar, item, field)?;
                }
                Ok(())
            }
            Assign::Record { source, .. } => {
                let encoder = self.encoder(source)?;
                self.run(encoder, value, at, out)
            }
            Assign::RecordArray { source, len, .. } => {
                let encoder = self.encoder(source)?;
                for j in 0..*len {
                    self.run(encoder, value.and_then(|v| v.index(j)), at + j * size, out)?;
                }
                Ok(())
            }
        }
    }

    fn literal(&self, literal: &Literal) -> Result<i64> {
        match literal {
            Literal::Int(n) => Ok(*n),
            Literal::Symbol(name) => self
                .constants
                .get(name)
                .copied()
                .ok_or_else(|| RuntimeError::UnknownConstant(name.clone())),
        }
    }
}

fn member<'v>(value: Option<&'v Value>, name: &str) -> Option<&'v Value> {
    value.and_then(|v| v.field(name))
}

/// Integer value of `value`; absent reads as zero.
fn int(value: Option<&Value>, field: &str) -> Result<i64> {
    match value {
        None => Ok(0),
        Some(v) => v.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
            field: field.to_owned(),
            expected: "a number",
        }),
    }
}

fn length(value: Option<&Value>, length_field: &str) -> Result<usize> {
    let n = int(member(value, length_field), length_field)?;
    usize::try_from(n).map_err(|_| RuntimeError::TypeMismatch {
        field: length_field.to_owned(),
        expected: "a non-negative length",
    })
}

fn write_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// Little-endian store of `value` into `dst`, converted to `class`.
fn write_scalar(
    dst: &mut [u8],
    class: Option<ScalarClass>,
    value: Option<&Value>,
    field: &str,
) -> Result<()> {
    let mismatch = |expected| RuntimeError::TypeMismatch {
        field: field.to_owned(),
        expected,
    };

    match class.ok_or_else(|| mismatch("a record value"))? {
        ScalarClass::Float => {
            let f = match value {
                None => 0.0,
                Some(v) => v.as_float().ok_or_else(|| mismatch("a number"))?,
            };
            match dst.len() {
                4 => dst.copy_from_slice(&(f as f32).to_le_bytes()),
                8 => dst.copy_from_slice(&f.to_le_bytes()),
                _ => return Err(mismatch("a 4- or 8-byte float slot")),
            }
        }
        ScalarClass::Bool => {
            let n = int(value, field)?;
            dst.fill(0);
            dst[0] = u8::from(n != 0);
        }
        ScalarClass::Unsigned | ScalarClass::Signed => {
            let bytes = int(value, field)?.to_le_bytes();
            let len = dst.len().min(bytes.len());
            dst[..len].copy_from_slice(&bytes[..len]);
        }
    }
    Ok(())
}
