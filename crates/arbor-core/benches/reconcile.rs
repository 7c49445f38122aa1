use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{build, create_root, Element, HostBackend, MemoryHost, Props, Root};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const SECTIONS: usize = 4;
const ROW_SAMPLES: &[usize] = &[16, 64, 256];

fn row(section: usize, index: usize, revision: usize) -> Element {
    build(
        "li",
        Props::new().attr("data-row", format!("{section}-{index}")),
        vec![Element::text(format!("item {section}-{index} rev {revision}"))],
    )
}

fn tree(sections: usize, rows: usize, revision: usize) -> Element {
    let mut children = Vec::with_capacity(sections);
    for section in 0..sections {
        let items = (0..rows).map(move |index| row(section, index, revision));
        children.push(build(
            "ul",
            Props::new().attr("data-section", section),
            vec![Element::list(items)],
        ));
    }
    build("div", Props::new(), children)
}

fn fresh_root() -> Root {
    let mut memory = MemoryHost::new();
    let container = memory.create_container();
    let host: Rc<RefCell<dyn HostBackend>> = Rc::new(RefCell::new(memory));
    create_root(host, container)
}

fn mount_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for &rows in ROW_SAMPLES {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let root = fresh_root();
                root.render(tree(SECTIONS, rows, 0)).expect("mount");
            });
        });
    }
    group.finish();
}

fn rerender_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rerender");
    for &rows in ROW_SAMPLES {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let root = fresh_root();
            root.render(tree(SECTIONS, rows, 0)).expect("mount");
            let mut revision = 0usize;
            b.iter(|| {
                revision += 1;
                root.render(tree(SECTIONS, rows, revision)).expect("rerender");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, mount_benchmark, rerender_benchmark);
criterion_main!(benches);
