use roster_core::language::Language;

#[test]
fn maps_wire_ids() {
    assert_eq!(Language::from_wire_id(1), Some(Language::Spanish));
    assert_eq!(Language::from_wire_id(2), Some(Language::English));
    assert_eq!(Language::from_wire_id(3), Some(Language::French));
    assert_eq!(Language::from_wire_id(0), None);
    assert_eq!(Language::French.wire_id(), 3);
}

#[test]
fn parses_codes_names_and_ids() {
    assert_eq!("es".parse::<Language>(), Ok(Language::Spanish));
    assert_eq!("English".parse::<Language>(), Ok(Language::English));
    assert_eq!(" FR ".parse::<Language>(), Ok(Language::French));
    assert_eq!("2".parse::<Language>(), Ok(Language::English));
    assert!("de".parse::<Language>().is_err());
}

#[test]
fn defaults_to_english() {
    assert_eq!(Language::default(), Language::English);
    assert_eq!(Language::default().code(), "en");
}
