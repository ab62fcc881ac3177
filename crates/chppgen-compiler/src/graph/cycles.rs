//! Dependency cycle detection.

use super::TypeGraph;
use crate::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Fail with the first dependency cycle found, as a path that starts and ends
/// with the same type.
pub fn check_acyclic(graph: &TypeGraph) -> Result<()> {
    let mut marks = vec![Mark::Unvisited; graph.len()];

    for (start, _) in graph.iter() {
        if marks[start.index()] != Mark::Unvisited {
            continue;
        }
        marks[start.index()] = Mark::OnStack;
        // (type, index of the next dependency to visit)
        let mut stack = vec![(start, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (id, next) = *frame;
            let deps = &graph.get(id).dependencies;
            let Some(&dep) = deps.get(next) else {
                marks[id.index()] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[dep.index()] {
                Mark::Unvisited => {
                    marks[dep.index()] = Mark::OnStack;
                    stack.push((dep, 0));
                }
                Mark::OnStack => {
                    let from = stack.iter().position(|(s, _)| *s == dep).unwrap_or(0);
                    let mut path: Vec<String> = stack[from..]
                        .iter()
                        .map(|(s, _)| graph.get(*s).name.clone())
                        .collect();
                    path.push(graph.get(dep).name.clone());
                    return Err(Error::DependencyCycle(path));
                }
                Mark::Done => {}
            }
        }
    }
    Ok(())
}
