use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsmart_sdk_generator::{
    service::build_services, EndpointDescriptor, Language, Parameter, SdkConfig, SdkGenerator,
};

fn endpoints(count: usize) -> Vec<EndpointDescriptor> {
    let tags = ["users", "orders", "widgets", "billing"];
    (0..count)
        .map(|i| {
            let tag = tags[i % tags.len()];
            let mut endpoint = EndpointDescriptor::new(
                if i % 3 == 0 { "post" } else { "get" },
                format!("/{}/{{id}}/items{}", tag, i),
            )
            .with_parameter(Parameter::path("id"))
            .with_tag(tag);
            if i % 2 == 0 {
                endpoint = endpoint.with_parameter(Parameter::query("limit"));
            }
            if i % 3 == 0 {
                endpoint = endpoint.with_request_body();
            }
            endpoint
        })
        .collect()
}

fn bench_service_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("service_planning");

    for size in [10, 100, 1000] {
        let input = endpoints(size);
        group.bench_with_input(BenchmarkId::new("build_services", size), &input, |b, input| {
            b.iter(|| black_box(build_services(input)));
        });
    }

    group.finish();
}

fn bench_generate_sdk(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_sdk");
    let generator = SdkGenerator::new();
    let input = endpoints(100);

    for language in Language::BUILTIN {
        let config = SdkConfig::new(language.clone(), "bench", "https://api.bench.test");
        group.bench_with_input(
            BenchmarkId::new("language", language.to_string()),
            &config,
            |b, config| {
                b.iter(|| black_box(generator.generate_sdk(&input, config)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_service_planning, bench_generate_sdk);
criterion_main!(benches);
