//! Property-based tests for pdview-core parsing.
//!
//! Arbitrary and mutated patch lines must never panic, and every widget that
//! comes out must respect the model's invariants.

use proptest::prelude::*;
use pdview_core::{
    MemorySource, ParseOptions, PatchParser, Rgb, Widget, WidgetKind, parse_line,
    parse_line_detailed,
};

/// A supported widget line with `send`/`receive` in the declared positions.
fn widget_line(kind: usize, send: &str, receive: &str, min: f32, max: f32, value: f32) -> String {
    match kind % 5 {
        0 => format!(
            "#X obj 10 20 hsl 128 15 {min} {max} 0 {send} {receive} empty 0 -9 0 10 #fcfcfc #000000 #000000 0 1 {value};"
        ),
        1 => format!(
            "#X obj 10 20 vsl 15 128 {min} {max} 0 {send} {receive} empty 0 -9 0 10 #fcfcfc #000000 #000000 0 1 {value};"
        ),
        2 => format!("#X obj 10 20 tgl 15 0 {send} {receive} empty 17 7 0 10 #fcfcfc #000000 #000000 0 1;"),
        3 => format!("#X obj 10 20 bng 15 250 {send} {receive} empty 17 7 0 10;"),
        _ => format!("#X floatatom 10 20 5 {min} {max} 0 - {send} {receive} 0 0 {value};"),
    }
}

fn symbol() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("empty".to_string()),
        Just("-".to_string()),
        "[a-z][a-z0-9_]{0,8}",
    ]
}

fn check_invariants(widget: &Widget) -> Result<(), TestCaseError> {
    if let Some(range) = widget.value_range() {
        let v = widget.initial_value();
        prop_assert!(range.contains(v), "initial value {} outside {:?}", v, range);
    }
    if !matches!(widget.kind, WidgetKind::Label { .. }) {
        prop_assert!(!widget.channels.is_unbound(), "unbound widget {:?}", widget);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any printable line parses without panicking.
    #[test]
    fn arbitrary_lines_never_panic(line in "[ -~]{0,120}") {
        let _ = parse_line_detailed(&line, &ParseOptions::default());
    }

    /// Lines built from patch-like tokens never panic either.
    #[test]
    fn tokenish_lines_never_panic(
        tokens in prop::collection::vec(
            prop_oneof![
                Just("#X".to_string()),
                Just("obj".to_string()),
                Just("floatatom".to_string()),
                Just("restore".to_string()),
                Just("pd".to_string()),
                Just("hsl".to_string()),
                Just("tgl".to_string()),
                Just("cnv".to_string()),
                Just(";".to_string()),
                "-?[0-9]{1,4}(\\.[0-9]{1,2})?;?",
                "#[0-9a-fA-F]{0,7}",
                "[a-z_]{1,6};?",
            ],
            0..24,
        )
    ) {
        let line = tokens.join(" ");
        if let Ok(Some(widget)) = parse_line_detailed(&line, &ParseOptions::default()) {
            check_invariants(&widget)?;
        }
    }

    /// Lines that do not start with `#X` produce nothing.
    #[test]
    fn non_directive_lines_yield_no_widget(rest in "[ -~]{0,80}") {
        let line = format!("#N {rest}");
        prop_assert_eq!(parse_line_detailed(&line, &ParseOptions::default()), Ok(None));
    }

    /// Start-up values are clamped into the declared range, whichever way it runs.
    #[test]
    fn initial_value_within_range(
        kind in 0usize..5,
        send in symbol(),
        receive in symbol(),
        min in -1000.0f32..1000.0,
        max in -1000.0f32..1000.0,
        value in -5000.0f32..5000.0,
    ) {
        let line = widget_line(kind, &send, &receive, min, max, value);
        match parse_line(&line) {
            Some(widget) => check_invariants(&widget)?,
            None => {
                // Only sliders, toggles and triggers are dropped, and only when unbound.
                prop_assert!(kind % 5 != 4, "number entry dropped: {}", line);
                prop_assert!(
                    matches!(send.as_str(), "empty" | "-") && matches!(receive.as_str(), "empty" | "-"),
                    "bound widget dropped: {}", line
                );
            }
        }
    }

    /// Well-formed colours round-trip through their text form.
    #[test]
    fn hex_colors_parse(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let text = format!("#{r:02x}{g:02x}{b:02X}");
        prop_assert_eq!(Rgb::from_hex(&text), Some(Rgb::new(r, g, b)));
    }

    /// Anything that is not `#` plus six hex digits is rejected.
    #[test]
    fn malformed_colors_rejected(text in "#?[0-9a-fA-Fg-z]{0,9}") {
        let well_formed = text.len() == 7
            && text.starts_with('#')
            && text[1..].bytes().all(|b| b.is_ascii_hexdigit());
        prop_assert_eq!(Rgb::from_hex(&text).is_some(), well_formed);
    }

    /// Flattening translates every child widget by the subpatch position.
    #[test]
    fn subpatch_offsets_add(
        ox in -500i32..500,
        oy in -500i32..500,
        cx in 0i32..300,
        cy in 0i32..300,
    ) {
        let source = MemorySource::new()
            .with("main.pd", format!("#X restore {ox} {oy} pd child;"))
            .with("child.pd", format!("#X obj {cx} {cy} tgl 15 0 s r empty 0;"));
        let doc = PatchParser::new(source, ParseOptions::default()).parse_file("main.pd");
        prop_assert_eq!(doc.len(), 1);
        let position = doc.widgets()[0].position;
        prop_assert_eq!(position.x, (ox + cx) as f32);
        prop_assert_eq!(position.y, (oy + cy) as f32);
    }
}
