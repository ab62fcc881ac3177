//! Dependency-first ordering of graph types.

use crate::graph::{TypeGraph, TypeId};

/// Post-order over everything reachable from `roots`: each type follows all
/// of its dependencies, and no type appears twice.
///
/// Dependencies are visited in name order; roots in the order given.
pub fn post_order(graph: &TypeGraph, roots: impl IntoIterator<Item = TypeId>) -> Vec<TypeId> {
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::with_capacity(graph.len());

    for root in roots {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        let mut stack = vec![(root, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (id, next) = *frame;
            match graph.get(id).dependencies.get(next) {
                Some(&dep) => {
                    frame.1 += 1;
                    if !visited[dep.index()] {
                        visited[dep.index()] = true;
                        stack.push((dep, 0));
                    }
                }
                None => {
                    order.push(id);
                    stack.pop();
                }
            }
        }
    }
    order
}

/// Declaration order: [`post_order`] from the roots sorted by name.
pub fn declaration_order(graph: &TypeGraph) -> Vec<TypeId> {
    let mut roots = graph.roots().to_vec();
    roots.sort_by(|a, b| graph.get(*a).name.cmp(&graph.get(*b).name));
    post_order(graph, roots)
}
