// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// 把元素子树展平为文本，`<br>` 转为换行
///
/// 提取器在展平标记前必须保留段落结构，否则多行内容会黏成一行。
pub fn text_with_breaks(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect(*element, &[], &mut out);
    out
}

/// 与 [`text_with_breaks`] 相同，但跳过class命中排除列表的整棵子树
///
/// 用于从内容容器中剔除推文回应、元数据行等非内容结构。
pub fn text_without(element: ElementRef<'_>, skip_classes: &[&str]) -> String {
    let mut out = String::new();
    collect(*element, skip_classes, &mut out);
    out
}

fn collect(node: NodeRef<'_, Node>, skip_classes: &[&str], out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&text.text),
        Node::Element(element) => {
            if element.name() == "br" {
                out.push('\n');
                return;
            }
            if has_any_class(element, skip_classes) {
                return;
            }
            for child in node.children() {
                collect(child, skip_classes, out);
            }
        }
        _ => {
            for child in node.children() {
                collect(child, skip_classes, out);
            }
        }
    }
}

fn has_any_class(element: &scraper::node::Element, skip_classes: &[&str]) -> bool {
    if skip_classes.is_empty() {
        return false;
    }
    element
        .attr("class")
        .map(|classes| {
            classes
                .split_whitespace()
                .any(|c| skip_classes.contains(&c))
        })
        .unwrap_or(false)
}
