pub mod config;
pub mod date;
pub mod discover;
pub mod events;
pub mod hasher;
pub mod layout;
pub mod mover;
pub mod organizer;
pub mod pool;
pub mod sync;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, CollectConfig,
    Config, ConfigError, EventsConfig, ScanConfig, SyncConfig,
};
pub use date::{
    parse_compact_date, sentinel_date, DateError, DateResolver, DateSource, ExifMetadataReader,
    MetadataError, MetadataReader, ResolvedDate,
};
pub use discover::{DiscoveredItem, Discoverer, DiscoveryError, DiscoveryStats, DEFAULT_EXTENSIONS};
pub use events::{
    create_event_log, ChannelSink, DroppedEvents, EventEnvelope, EventLogWriter, EventSink,
    FanoutSink, NullSink, OrganizeEvent, TracingSink,
};
pub use hasher::{digest_file, ContentDigest, HashError, Hasher};
pub use layout::{canonical_destination, canonical_dir};
pub use mover::{MoveError, MoveFailure, MoveOutcome, Mover, MoverConfig, SafeMover, SkipReason};
pub use organizer::{OrganizeError, Organizer, RunReport};
pub use pool::{
    work_queue, ItemOutcome, PoolConfig, PoolReport, QueueProducer, WorkItem, WorkQueue,
    WorkerPool,
};
pub use sync::sync_command;
