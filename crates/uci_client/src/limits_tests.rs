use super::*;

#[test]
fn test_go_commands() {
    assert_eq!(GoLimits::depth(12).to_command(), "go depth 12");
    assert_eq!(GoLimits::movetime(250).to_command(), "go movetime 250");
    let both = GoLimits {
        depth: Some(8),
        movetime_ms: Some(500),
    };
    assert_eq!(both.to_command(), "go depth 8 movetime 500");
}

#[test]
fn test_empty_limits_never_search_forever() {
    assert!(GoLimits::default().is_empty());
    assert_eq!(GoLimits::default().to_command(), "go movetime 1000");
}

#[test]
fn test_or_prefers_explicit_limits() {
    let fallback = GoLimits::movetime(300);
    assert_eq!(GoLimits::depth(3).or(fallback), GoLimits::depth(3));
    assert_eq!(GoLimits::default().or(fallback), fallback);
}
