// src/dungeon/graph.rs
use super::Dungeon;
use crate::grid::{Direction, GridPos};
use petgraph::algo::{connected_components, dijkstra};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Граф смежности комнат: узлы в порядке создания комнат (вход — узел 0),
/// рёбра между занятыми соседними клетками.
#[must_use]
pub fn build_room_graph(dungeon: &Dungeon<'_>) -> UnGraph<GridPos, ()> {
    let mut graph = UnGraph::new_undirected();
    let mut pos_to_node = HashMap::with_capacity(dungeon.len());

    for room in dungeon.rooms() {
        pos_to_node.insert(room.position, graph.add_node(room.position));
    }

    // Каждую пару рёбер добавляем один раз: смотрим только на север и восток
    for room in dungeon.rooms() {
        for direction in [Direction::North, Direction::East] {
            let other = room.position.step(direction);
            if let Some(&b) = pos_to_node.get(&other) {
                graph.add_edge(pos_to_node[&room.position], b, ());
            }
        }
    }
    graph
}

/// Связный граф без циклов: одна компонента и `рёбер = узлов - 1`
#[must_use]
pub fn is_spanning_tree(graph: &UnGraph<GridPos, ()>) -> bool {
    graph.node_count() > 0
        && connected_components(graph) == 1
        && graph.edge_count() + 1 == graph.node_count()
}

/// Кратчайшие расстояния (в переходах) от входа до каждой комнаты
#[must_use]
pub fn shortest_distances(graph: &UnGraph<GridPos, ()>) -> HashMap<GridPos, u32> {
    if graph.node_count() == 0 {
        return HashMap::new();
    }
    dijkstra(graph, NodeIndex::new(0), None, |_| 1u32)
        .into_iter()
        .map(|(node, d)| (graph[node], d))
        .collect()
}
