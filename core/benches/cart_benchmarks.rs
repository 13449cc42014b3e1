use bakery_core::{Cart, CartItem, CartPricingEngine, CartService, InMemoryCartStore, ShippingMethod};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion

fn item(i: usize) -> CartItem {
  CartItem::new(format!("p{}", i), format!("Cookie {}", i), 200 + i as i64, 1)
}

fn cart_with_lines(lines: usize) -> Cart {
  let mut cart = Cart::new();
  for i in 0..lines {
    let _ = CartPricingEngine::add_item(&mut cart, item(i));
  }
  cart
}

// --- Pure engine operations ---

fn bench_engine_add_item(c: &mut Criterion) {
  let mut group = c.benchmark_group("EngineAddItem");

  for lines in [1usize, 10, 100].iter() {
    group.throughput(Throughput::Elements(1));
    group.bench_with_input(BenchmarkId::new("merge_into", lines), lines, |b, &lines| {
      b.iter_batched(
        || cart_with_lines(lines),
        |mut cart| {
          let _ = CartPricingEngine::add_item(&mut cart, item(0));
          cart
        },
        BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

fn bench_engine_summarize(c: &mut Criterion) {
  let mut group = c.benchmark_group("EngineSummarize");
  let engine = CartPricingEngine::default();

  for lines in [1usize, 10, 100].iter() {
    let cart = cart_with_lines(*lines);
    group.bench_with_input(BenchmarkId::new("express", lines), &cart, |b, cart| {
      b.iter(|| engine.summarize(cart, ShippingMethod::Express));
    });
  }
  group.finish();
}

// --- Full mutation pipeline against the in-memory store ---

fn bench_service_mutation(c: &mut Criterion) {
  let mut group = c.benchmark_group("ServiceMutation");
  let rt = Runtime::new().unwrap();

  for lines in [1usize, 10, 100].iter() {
    let store = Arc::new(InMemoryCartStore::new());
    let service = CartService::new(store, CartPricingEngine::default());
    rt.block_on(async {
      for i in 0..*lines {
        service.add_item(Some("bench"), item(i)).await.unwrap();
      }
    });

    group.bench_with_input(BenchmarkId::new("increment", lines), lines, |b, _| {
      b.to_async(&rt).iter(|| async {
        service.increment(Some("bench"), "p0").await.unwrap();
      });
    });
  }
  group.finish();
}

criterion_group!(
  benches,
  bench_engine_add_item,
  bench_engine_summarize,
  bench_service_mutation
);
criterion_main!(benches);
