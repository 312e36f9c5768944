//! To run the benchmark, from the root of the workspace, run:
//! ```sh
//! cargo bench -qp binary-merkle
//! ```
use binary_merkle::Tree;

#[cfg(feature = "bench_include_allocs")]
#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

const SIZES: [usize; 4] = [16, 256, 4_096, 65_536];

fn blocks(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("block-{i}")).collect()
}

/// Benchmarks building a tree from `n` blocks.
#[divan::bench(args = SIZES)]
fn from_blocks(bencher: divan::Bencher, n: usize) {
    let blocks = blocks(n);
    bencher.bench(|| Tree::from_blocks(divan::black_box(&blocks)));
}

/// Benchmarks constructing a proof for the last block, which requires the longest
/// membership scan.
#[divan::bench(args = SIZES)]
fn proof(bencher: divan::Bencher, n: usize) {
    let blocks = blocks(n);
    let tree = Tree::from_blocks(&blocks);
    let last = &blocks[n - 1];
    bencher.bench(|| tree.proof(divan::black_box(last)));
}

/// Benchmarks verifying a proof against the root.
#[divan::bench(args = SIZES)]
fn audit(bencher: divan::Bencher, n: usize) {
    let blocks = blocks(n);
    let tree = Tree::from_blocks(&blocks);
    let root = tree
        .root()
        .digest()
        .expect("the tree was built from at least one block");
    let value = &blocks[n / 2];
    let proof = tree.proof(value);
    bencher.bench(|| {
        proof
            .audit()
            .with_root(root)
            .with_value(divan::black_box(value))
            .perform()
    });
}

/// Benchmarks enumerating all levels of the tree.
#[divan::bench(args = SIZES)]
fn levels(bencher: divan::Bencher, n: usize) {
    let tree = Tree::from_blocks(blocks(n));
    bencher.bench(|| tree.levels().map(|levels| levels.len()));
}

fn main() {
    // Handle `nextest` querying the benchmark binary for tests.  Currently `divan` is incompatible
    // with `nextest`, so just report no tests available.
    // See https://github.com/nvzqz/divan/issues/43 for further details.
    let args: Vec<_> = std::env::args().collect();
    if args.contains(&"--list".to_string())
        && args.contains(&"--format".to_string())
        && args.contains(&"terse".to_string())
    {
        return;
    }
    // Run registered benchmarks.
    divan::main();
}
