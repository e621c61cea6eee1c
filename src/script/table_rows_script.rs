/// WebDriver script body (run through `execute`, hence the `return`) that snapshots every
/// table row: its visible text, the text of each `td`, and the text of every descendant
/// element in document order.
pub const TABLE_ROWS_SCRIPT: &str = r#"
return Array.from(document.querySelectorAll('tr')).map(row => ({
    text: (row.innerText || '').trim(),
    cells: Array.from(row.querySelectorAll('td')).map(cell => cell.innerText || ''),
    descendants: Array.from(row.querySelectorAll('*')).map(el => el.innerText || ''),
}));
"#;

/// Resolves to `[readyState, resourceEntryCount]`, used to approximate network idleness.
pub const NETWORK_ACTIVITY_SCRIPT: &str = r#"
return [
    document.readyState,
    (window.performance && performance.getEntriesByType)
        ? performance.getEntriesByType('resource').length
        : 0,
];
"#;
