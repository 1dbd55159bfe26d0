use std::path::{Path, PathBuf};

/// A clean WordPress-style RSS export with `items` posts
pub fn wordpress_export(items: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
<title>Example Site</title>
"#,
    );
    for i in 0..items {
        xml.push_str(&format!(
            r##"<item>
<title>Post {i}</title>
<wp:post_id>{i}</wp:post_id>
<content:encoded><![CDATA[Body of post {i} in <span style="color:#336699">blue</span>]]></content:encoded>
<wp:postmeta><wp:meta_value><![CDATA[Icon <svg width="24" height="24"><path d="M0 0L24 24"/></svg>]]></wp:meta_value></wp:postmeta>
</item>
"##
        ));
    }
    xml.push_str("</channel>\n</rss>\n");
    xml
}

/// Export where every post carries one invalid hex color and one unclosed SVG shape
pub fn faulty_wordpress_export(items: usize) -> String {
    wordpress_export(items)
        .replace("color:#336699", "color:#33669")
        .replace(r#"<path d="M0 0L24 24"/>"#, r#"<path d="M0 0L24 24">"#)
}

/// Write `content` to `dir/name` and return the path
pub fn write_xml(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test XML");
    path
}
