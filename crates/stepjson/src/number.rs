/// Append a finite f64 to the output as a JSON number literal.
///
/// Uses the shortest round-trippable representation. Exponent notation is
/// valid JSON and is kept as produced.
pub(crate) fn write_finite_f64(out: &mut String, value: f64) {
    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format_finite(value));
}
