//! Debug wireframe: outlines matching nodes instead of painting them.

use crate::config::WireframeConfig;
use crate::emitters::{Painter, TextStyle};
use crate::math::BoundingBox;
use crate::node::Node;
use crate::text;

const LABEL_INSET: f32 = 2.0;

/// What the outline says about the node.
pub(crate) fn label(node: &Node) -> String {
    if let Some(expression) = &node.text_expression {
        format!("{{{{{expression}}}}}")
    } else if let Some(condition) = &node.visible_when {
        if condition.when {
            format!("?{}", condition.expression)
        } else {
            format!("?!{}", condition.expression)
        }
    } else {
        "[REACTIVE]".to_string()
    }
}

/// A 1px outline in the wireframe color plus the label in its top-left corner.
pub(crate) fn wireframe(p: &mut Painter<'_>, node: &Node, bounds: BoundingBox, config: &WireframeConfig) {
    p.border(bounds, config.color, 1.0, 0.0);

    let label = label(node);
    let area = BoundingBox::new(
        bounds.x + LABEL_INSET,
        bounds.y + LABEL_INSET,
        text::estimate_width(&label, config.label_font_size),
        config.label_font_size,
    );
    p.text(area, label, TextStyle::new(config.color, config.label_font_size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Condition;
    use crate::node::{ComponentKind, Tree};

    #[test]
    fn labels_by_reactivity() {
        let mut tree = Tree::new();
        let root = tree.add_root(ComponentKind::Column);
        let bound = tree.add_child(root, ComponentKind::Text);
        tree[bound].text_expression("user.name");
        let gated = tree.add_child(root, ComponentKind::Container);
        tree[gated].visible_when(Condition::when_true("show"));
        let negated = tree.add_child(root, ComponentKind::Container);
        tree[negated].visible_when(Condition::new("hidden", false));

        assert_eq!(label(&tree[bound]), "{{user.name}}");
        assert_eq!(label(&tree[gated]), "?show");
        assert_eq!(label(&tree[negated]), "?!hidden");
        assert_eq!(label(&tree[root]), "[REACTIVE]");
    }
}
