use std::collections::HashMap;

use tracing::warn;

use crate::object::AnnotationObject;

/// An imported object with the ids parsed from its comment
pub(crate) struct ImportedObject {
    pub object: AnnotationObject,
    pub object_id: i64,
    pub parent_id: i64,
}

/// Nest imported objects under their parents.
///
/// Only positive ids link. Each object gets at most one parent, assigned in
/// batch order; a link that would close a cycle is dropped. When several
/// objects share an id, the first one is the link target.
pub(crate) fn link_objects(imported: Vec<ImportedObject>) -> Vec<AnnotationObject> {
    let mut index_of: HashMap<i64, usize> = HashMap::new();
    for (i, item) in imported.iter().enumerate() {
        if item.object_id > 0 {
            index_of.entry(item.object_id).or_insert(i);
        }
    }

    // `up` is a union-find over the forest built so far; `find` yields the
    // current root of a tree. An object is still a root when its own link is
    // considered, so the link closes a cycle exactly when the parent's root is
    // the object itself.
    let mut up: Vec<usize> = (0..imported.len()).collect();
    let mut parent_of: Vec<Option<usize>> = vec![None; imported.len()];
    for (i, item) in imported.iter().enumerate() {
        if item.object_id <= 0 || item.parent_id <= 0 {
            continue;
        }
        let Some(&parent) = index_of.get(&item.parent_id) else {
            continue;
        };
        let root = find(&mut up, parent);
        if root == i {
            warn!(
                "Object {} would close a parent cycle through {}, keeping it at the top level",
                item.object_id, item.parent_id
            );
            continue;
        }
        parent_of[i] = Some(parent);
        up[i] = root;
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); imported.len()];
    let mut roots = Vec::new();
    for (i, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    let mut slots: Vec<Option<AnnotationObject>> =
        imported.into_iter().map(|item| Some(item.object)).collect();
    roots
        .into_iter()
        .filter_map(|root| assemble(root, &children, &mut slots))
        .collect()
}

fn find(up: &mut [usize], node: usize) -> usize {
    let mut root = node;
    while up[root] != root {
        root = up[root];
    }
    let mut current = node;
    while up[current] != root {
        let next = up[current];
        up[current] = root;
        current = next;
    }
    root
}

/// Build the tree below `root` bottom-up: every node is visited after all of
/// its descendants, so its children are complete when they are attached.
fn assemble(
    root: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<AnnotationObject>],
) -> Option<AnnotationObject> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(children[node].iter().copied());
    }

    for &node in order.iter().rev() {
        let built: Vec<AnnotationObject> = children[node]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        if let Some(object) = slots[node].as_mut() {
            object.children.extend(built);
        }
    }
    slots[root].take()
}
