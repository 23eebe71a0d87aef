use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use atlaserp_auth::{
    ActiveTenant, OperationPolicy, Permission, Principal, Role, RoleBinding, UserStatus,
    authorize_operation,
};
use atlaserp_core::{TenantId, UserId};

fn principal_with_permissions(count: usize, home: TenantId) -> Principal {
    let permissions = (0..count)
        .map(|i| Permission::new(format!("module{}.action{}", i % 7, i)))
        .collect();
    Principal {
        user_id: UserId::new(),
        email: "bench@example.com".to_string(),
        home_tenant_id: Some(home),
        role: RoleBinding {
            name: Role::new("clerk"),
            permissions,
        },
        status: UserStatus::Active,
    }
}

/// The full admission chain as it runs on every guarded request.
fn bench_authorize_operation(c: &mut Criterion) {
    const POLICY: OperationPolicy = OperationPolicy::require(&[
        Permission::from_static("partners.read"),
        Permission::from_static("partners.manage"),
    ]);

    let mut group = c.benchmark_group("authorize_operation");
    for perm_count in [4usize, 32, 256] {
        let home = TenantId::new();
        let mut principal = principal_with_permissions(perm_count, home);
        // Worst case: the matching permission sits at the end of the set.
        principal
            .role
            .permissions
            .push(Permission::new("partners.manage"));
        let active = ActiveTenant::new(home);

        group.bench_with_input(
            BenchmarkId::from_parameter(perm_count),
            &perm_count,
            |b, _| {
                b.iter(|| {
                    authorize_operation(black_box(&principal), black_box(active), &POLICY).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_authorize_operation);
criterion_main!(benches);
