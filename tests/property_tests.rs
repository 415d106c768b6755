//! Property-based tests for the dump/parse round trip.
//!
//! Trees are generated from a small recursive shape, built into a
//! [`Document`], dumped under several quoting policies and parsed back.
//! Raw text made of escapes, quotes, brackets and braces is also scanned
//! first, so the round trip is checked on trees only the scanner produces.

use proptest::prelude::*;
use vdf_tree::{
    dump_with_options, parse_with_options, Document, DumpOptions, NodeId, Pair, ParseOptions, Quote,
    Value,
};

#[derive(Debug, Clone)]
enum Entry {
    Pair(String, String, Option<String>),
    Set(String, Vec<Entry>),
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_.]{1,8}",
        "[ -~]{0,12}",
        "[a-z\\\\\"{}\t\n ]{0,8}",
    ]
}

fn query() -> impl Strategy<Value = String> {
    "[!$A-Z0-9_]{1,8}"
}

fn typed_token() -> impl Strategy<Value = String> {
    "-?[0-9]{1,9}|true|false|[a-z]{1,6}|-?[0-9]{1,6}\\.[0-9]{1,6}"
}

// Raw fragments: bare words, quoted strings, bracketed tags and bare
// tokens with backslashes, joined with spaces and braces.
fn scanned_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        "[a-z0-9_.]{1,6}",
        r#""[a-z \\"{}\[\]]{0,6}""#,
        r"\[[a-z$!\\{} ]{0,5}\]",
        r#"[a-z\\\[\]{}"]{1,6}"#,
        Just("{".to_string()),
        Just("}".to_string()),
        Just("\n".to_string()),
    ];
    prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.join(" "))
}

fn entry() -> impl Strategy<Value = Entry> {
    let leaf = (token(), token(), proptest::option::of(query()))
        .prop_map(|(k, v, q)| Entry::Pair(k, v, q));
    leaf.prop_recursive(4, 48, 6, |inner| {
        (token(), prop::collection::vec(inner, 0..6)).prop_map(|(k, c)| Entry::Set(k, c))
    })
}

fn build(doc: &mut Document, parent: NodeId, entries: &[Entry]) {
    for entry in entries {
        match entry {
            Entry::Pair(k, v, q) => {
                let mut pair = Pair::new(k.as_str(), v.as_str());
                pair.query = q.clone();
                let id = doc.create_pair(pair);
                doc.add(parent, id).unwrap();
            }
            Entry::Set(k, children) => {
                let id = doc.create_set(k.as_str());
                doc.add(parent, id).unwrap();
                build(doc, id, children);
            }
        }
    }
}

fn document(entries: &[Entry]) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    build(&mut doc, root, entries);
    doc
}

fn roundtrip(doc: &Document, dump: &DumpOptions, parse: &ParseOptions) -> bool {
    match dump_with_options(doc, dump) {
        Ok(text) => match parse_with_options(&text, parse) {
            Ok(back) => back == *doc,
            Err(e) => {
                eprintln!("Parse failed: {}", e);
                eprintln!("Dumped was: {:?}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Dump failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_always_quoted(entries in prop::collection::vec(entry(), 0..8)) {
        let doc = document(&entries);
        prop_assert!(roundtrip(&doc, &DumpOptions::strict(), &ParseOptions::new()));
    }

    #[test]
    fn prop_roundtrip_auto_quoted(entries in prop::collection::vec(entry(), 0..8)) {
        let doc = document(&entries);
        prop_assert!(roundtrip(&doc, &DumpOptions::new(), &ParseOptions::new()));
    }

    #[test]
    fn prop_roundtrip_custom_indent(
        entries in prop::collection::vec(entry(), 0..4),
        indent in "[ \t]{0,4}",
    ) {
        let doc = document(&entries);
        let dump = DumpOptions::new().with_indent(indent);
        prop_assert!(roundtrip(&doc, &dump, &ParseOptions::new()));
    }

    #[test]
    fn prop_roundtrip_typed(
        pairs in prop::collection::vec(("[a-z]{1,6}", typed_token()), 0..12)
    ) {
        let parse = ParseOptions::new().with_types(true);
        let mut doc = Document::new();
        for (k, v) in &pairs {
            let id = doc.create_pair(Pair::new(k.as_str(), Value::infer(v)));
            doc.add(doc.root(), id).unwrap();
        }
        prop_assert!(roundtrip(&doc, &DumpOptions::new(), &parse));

        // String values that look typed need AutoTyped to survive.
        let mut strings = Document::new();
        for (k, v) in &pairs {
            let id = strings.create_pair(Pair::new(k.as_str(), v.as_str()));
            strings.add(strings.root(), id).unwrap();
        }
        let auto_typed = DumpOptions::new().with_quote(Quote::AutoTyped);
        prop_assert!(roundtrip(&strings, &auto_typed, &parse));
    }

    #[test]
    fn prop_roundtrip_scanned(text in scanned_text()) {
        let plain = ParseOptions::new();
        if let Ok(doc) = parse_with_options(&text, &plain) {
            prop_assert!(roundtrip(&doc, &DumpOptions::strict(), &plain));
            prop_assert!(roundtrip(&doc, &DumpOptions::new(), &plain));
        }

        let typed = ParseOptions::new().with_types(true);
        if let Ok(doc) = parse_with_options(&text, &typed) {
            let auto_typed = DumpOptions::new().with_quote(Quote::AutoTyped);
            prop_assert!(roundtrip(&doc, &DumpOptions::strict(), &typed));
            prop_assert!(roundtrip(&doc, &auto_typed, &typed));
        }
    }

    #[test]
    fn prop_parse_never_panics(text in "[ -~\t\n]{0,64}") {
        let _ = parse_with_options(&text, &ParseOptions::new());
        let _ = parse_with_options(&text, &ParseOptions::json());
        let _ = parse_with_options(&text, &ParseOptions::new().with_escapes(false));
    }
}
