use pdf_booklet::*;

#[test]
fn test_stats_five_pages() {
    let stats = calculate_statistics(5, &BookletConfig::default()).unwrap();
    assert_eq!(stats.source_pages, 5);
    assert_eq!(stats.blank_pages_added, 3);
    assert_eq!(stats.padded_pages, 8);
    assert_eq!(stats.signatures, 1);
    assert_eq!(stats.cells_per_sheet, 8);
    assert_eq!(stats.output_sheets, 1);
}

#[test]
fn test_stats_exact_multiple() {
    let stats = calculate_statistics(24, &BookletConfig::default()).unwrap();
    assert_eq!(stats.blank_pages_added, 0);
    assert_eq!(stats.signatures, 3);
    assert_eq!(stats.output_sheets, 3);
}

#[test]
fn test_stats_no_pages() {
    let stats = calculate_statistics(0, &BookletConfig::default()).unwrap();
    assert_eq!(stats.padded_pages, 0);
    assert_eq!(stats.signatures, 0);
    assert_eq!(stats.output_sheets, 0);
}

#[test]
fn test_stats_sheet_count_rounds_up() {
    // 12 cells per sheet do not divide 32 padded pages evenly
    let config = BookletConfig {
        signature_size: 16,
        grid: GridSpec::new(2, 6),
        ..Default::default()
    };
    let stats = calculate_statistics(17, &config).unwrap();
    assert_eq!(stats.padded_pages, 32);
    assert_eq!(stats.signatures, 2);
    assert_eq!(stats.output_sheets, 3);
}

#[test]
fn test_stats_invalid_config() {
    let config = BookletConfig {
        signature_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        calculate_statistics(5, &config),
        Err(BookletError::Config(_))
    ));
}
