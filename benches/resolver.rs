//! Resolver 性能基准测试
//!
//! 内存仓库，测的是匹配 + 模板 + 授权本身的开销

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use golink::analytics::{ClickRecorder, ClientInfo};
use golink::errors::Result;
use golink::metrics_core::NoopMetrics;
use golink::services::{ResolverCore, ResolverSettings, UrlTemplate};
use golink::storage::{Link, LinkRepository, Visibility};

struct MemoryRepository {
    links: HashMap<String, Link>,
}

#[async_trait]
impl LinkRepository for MemoryRepository {
    async fn find_link_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        Ok(self.links.get(slug).cloned())
    }

    async fn has_share_grant(&self, _link_id: i64, _identity_id: i64) -> Result<bool> {
        Ok(false)
    }

    async fn count_links(&self) -> Result<u64> {
        Ok(self.links.len() as u64)
    }

    async fn count_identities(&self) -> Result<u64> {
        Ok(0)
    }
}

fn make_link(id: i64, slug: &str, template: &str) -> Link {
    let now = Utc::now();
    Link {
        id,
        slug: slug.to_string(),
        url_template: template.to_string(),
        visibility: Visibility::Public,
        owner_id: None,
        co_owner_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn create_resolver(link_count: usize) -> ResolverCore {
    let mut links = HashMap::new();
    for i in 0..link_count {
        let slug = format!("team{}/docs", i);
        links.insert(slug.clone(), make_link(i as i64, &slug, "https://docs.example.com/$page"));
    }
    links.insert("gh".to_string(), make_link(-1, "gh", "https://github.com/$user/$repo"));

    ResolverCore::new(
        Arc::new(MemoryRepository { links }),
        ClickRecorder::disabled(),
        NoopMetrics::arc(),
        ResolverSettings::default(),
    )
}

/// 精确匹配 vs 前缀回退
fn bench_resolve(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let resolver = create_resolver(1000);
    let client = ClientInfo::default();
    let mut group = c.benchmark_group("resolve");

    for path in ["gh/rust-lang/rust", "team42/docs/intro", "missing/a/b/c/d/e"] {
        group.bench_with_input(BenchmarkId::from_parameter(path), &path, |b, path| {
            b.to_async(&rt)
                .iter(|| async { resolver.resolve(path, None, &client).await.unwrap() });
        });
    }

    group.finish();
}

/// 模板解析与渲染
fn bench_template(c: &mut Criterion) {
    let template = UrlTemplate::parse("https://search.example.com/?q=$query&lang=$lang").unwrap();

    c.bench_function("template/parse", |b| {
        b.iter(|| UrlTemplate::parse("https://github.com/$user/$repo/issues/$number").unwrap());
    });

    c.bench_function("template/render", |b| {
        b.iter(|| template.render(&["hello world & more", "en"]).unwrap());
    });
}

criterion_group!(benches, bench_resolve, bench_template);
criterion_main!(benches);
