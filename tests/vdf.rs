// tests/vdf.rs

use steamdeploy::vdf::VdfBuilder;

#[test]
fn nested_objects_are_indented_two_spaces_per_level() {
    let vdf = VdfBuilder::new("root")
        .value("abc", "123")
        .object("branch", |branch| {
            branch
                .value("def", "456")
                .object("leaf", |leaf| leaf.value("ghi", "789"))
        })
        .render();

    let expected = concat!(
        "\"root\"\n",
        "{\n",
        "  \"abc\" \"123\"\n",
        "  \"branch\"\n",
        "  {\n",
        "    \"def\" \"456\"\n",
        "    \"leaf\"\n",
        "    {\n",
        "      \"ghi\" \"789\"\n",
        "    }\n",
        "  }\n",
        "}\n",
    );
    assert_eq!(vdf, expected);
}

#[test]
fn empty_object_renders_braces_only() {
    assert_eq!(VdfBuilder::new("empty").render(), "\"empty\"\n{\n}\n");
}

#[test]
fn display_matches_render() {
    let builder = VdfBuilder::new("n").value("k", 1);
    assert_eq!(builder.to_string(), builder.render());
}
