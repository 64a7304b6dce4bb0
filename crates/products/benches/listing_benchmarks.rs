use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_core::ProductId;
use catalog_products::{compute_listing, ListingQuery, Product, ProductDraft, ProductStore};

fn draft(i: usize) -> ProductDraft {
    let kind = if i % 3 == 0 { "Pass" } else { "Card" };
    ProductDraft::new()
        .with("gvtId", i as i64)
        .with("name", format!("Voucher {i} {kind}"))
        .with("productTagline", "tagline")
        .with("shortDescription", "short")
        .with("longDescription", "long")
        .with("productUrl", "https://shop.example.com/p")
        .with("voucherTypeName", "Digital")
        .with("orderUrl", "https://shop.example.com/o")
        .with("productTitle", format!("Voucher {i}"))
}

fn catalog(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| {
            draft(i)
                .into_product(ProductId::new(i as i64 + 1))
                .expect("bench draft is complete")
        })
        .collect()
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_listing");

    for size in [100usize, 1_000, 10_000] {
        let products = catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        let unfiltered = ListingQuery::new(2, 10, "").expect("valid query");
        group.bench_with_input(BenchmarkId::new("unfiltered", size), &products, |b, products| {
            b.iter(|| compute_listing(black_box(products), black_box(&unfiltered)))
        });

        let filtered = ListingQuery::new(1, 25, "pass").expect("valid query");
        group.bench_with_input(BenchmarkId::new("search", size), &products, |b, products| {
            b.iter(|| compute_listing(black_box(products), black_box(&filtered)))
        });
    }

    group.finish();
}

fn bench_store_create(c: &mut Criterion) {
    c.bench_function("store_create_1000", |b| {
        let drafts: Vec<ProductDraft> = (0..1_000).map(draft).collect();

        b.iter(|| {
            let store = ProductStore::new();
            for draft in drafts.iter().cloned() {
                black_box(store.create(draft).expect("complete draft"));
            }
        })
    });
}

criterion_group!(benches, bench_listing, bench_store_create);
criterion_main!(benches);
