use super::*;

#[test]
fn finds_mermaid_fences_in_order() {
    let text = "# Title\n\n```mermaid\ngraph TD\nA-->B\n```\n\ntext\n\n```mermaid\nsequenceDiagram\n```\n";
    let blocks = find_diagram_blocks(text);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].source, "graph TD\nA-->B");
    assert_eq!(blocks[1].source, "sequenceDiagram");
    assert!(blocks[0].end <= blocks[1].start);
    assert!(text[blocks[0].start..blocks[0].end].starts_with("```mermaid"));
}

#[test]
fn ignores_other_languages_and_unterminated_fences() {
    let text = "```rust\nfn main() {}\n```\n\n```mermaid\ngraph LR\n";
    assert!(find_diagram_blocks(text).is_empty());
}

#[test]
fn scanning_is_repeatable() {
    let text = "```mermaid\npie\n```";
    assert_eq!(find_diagram_blocks(text), find_diagram_blocks(text));
    assert_eq!(find_diagram_blocks(text)[0].source, "pie");
}
