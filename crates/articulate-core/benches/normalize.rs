use articulate_core::{html, normalize_sending_node, render_course_group};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

fn course(i: usize) -> Value {
    json!({"prefix": "MATH", "number": format!("{}A", i), "title": format!("Course {}", i), "notes": []})
}

/// GROUP tree `depth` levels deep, `width` children per level
fn deep_tree(depth: usize, width: usize) -> Value {
    if depth == 0 {
        let items: Vec<Value> = (0..width).map(course).collect();
        return json!({"type": "SET", "conjunction": "OR", "items": items});
    }
    let conjunction = if depth % 2 == 0 { "AND" } else { "OR" };
    let items: Vec<Value> = (0..width).map(|_| deep_tree(depth - 1, width)).collect();
    json!({"type": "GROUP", "conjunction": conjunction, "items": items})
}

fn bench_normalize(c: &mut Criterion) {
    let tree = deep_tree(4, 4);
    c.bench_function("normalize_deep_tree", |b| {
        b.iter(|| normalize_sending_node(black_box(&tree)))
    });
}

fn bench_render(c: &mut Criterion) {
    let group = normalize_sending_node(&deep_tree(4, 4));
    c.bench_function("render_deep_tree_markup", |b| {
        b.iter(|| html::to_markup(&render_course_group(black_box(&group))))
    });
}

criterion_group!(benches, bench_normalize, bench_render);
criterion_main!(benches);
