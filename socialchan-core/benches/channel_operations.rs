use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use socialchan_core::core_channel::{
    authorize, AccountId, ChannelManager, ChannelService, ChannelSqlStore, ChannelStore,
    ChannelType, MemoryChannelStore, Operation, StaticAccountDirectory,
};

fn bench_authorize(c: &mut Criterion) {
    let owner = AccountId::new("owner");
    let other = AccountId::new("other");
    let service = ChannelService::new(
        MemoryChannelStore::new(),
        StaticAccountDirectory::with_accounts(["owner"]),
    );
    let ownership = service
        .create_channel(&owner, "benchgroup", ChannelType::Chat)
        .unwrap()
        .ownership();

    c.bench_function("authorize_owner", |b| {
        b.iter(|| authorize(black_box(Operation::AddParticipant), &ownership, &owner))
    });
    c.bench_function("authorize_denied", |b| {
        b.iter(|| authorize(black_box(Operation::AddParticipant), &ownership, &other))
    });
}

fn add_remove_cycle<S: ChannelStore>(
    service: &ChannelService<S, StaticAccountDirectory>,
    channel_id: &socialchan_core::core_channel::ChannelId,
    owner: &AccountId,
    target: &AccountId,
) {
    service.add_participant(channel_id, owner, target).unwrap();
    service.remove_participant(channel_id, owner, target).unwrap();
}

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership_add_remove");
    let owner = AccountId::new("owner");
    let target = AccountId::new("member");
    let accounts = || StaticAccountDirectory::with_accounts(["owner", "member"]);

    let memory = ChannelService::new(MemoryChannelStore::new(), accounts());
    let channel = memory
        .create_channel(&owner, "benchgroup", ChannelType::Group)
        .unwrap();
    group.bench_with_input(BenchmarkId::new("store", "memory"), &channel.id, |b, id| {
        b.iter(|| add_remove_cycle(&memory, id, &owner, &target))
    });

    let sql = ChannelService::new(ChannelSqlStore::memory().unwrap(), accounts());
    let channel = sql
        .create_channel(&owner, "benchgroup", ChannelType::Group)
        .unwrap();
    group.bench_with_input(BenchmarkId::new("store", "sqlite"), &channel.id, |b, id| {
        b.iter(|| add_remove_cycle(&sql, id, &owner, &target))
    });

    group.finish();
}

criterion_group!(benches, bench_authorize, bench_membership);
criterion_main!(benches);
