use argbatch::CommandPrefix;
use argbatch::app::render::{OutputFormat, render};
use argbatch::app::size::partition_to_max_size;
use insta::assert_snapshot;

#[test]
fn plain_render_of_packed_batches() {
    let prefix = CommandPrefix::new(["/usr/bin/foo", "-c"]);
    let parts = partition_to_max_size(&prefix, &["one", "two", "three", "four"], 24);
    let rendered = render(&parts, OutputFormat::Plain).expect("render");
    assert_snapshot!("plain_render", rendered);
}
