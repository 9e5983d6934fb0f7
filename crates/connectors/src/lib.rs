pub mod sql {
    pub mod base {
        pub mod adapter;
        pub mod describe;
        pub mod error;
        pub mod executor;
        pub mod source;
    }

    pub mod mysql {
        pub mod adapter;
        pub mod config;
        pub mod params;
        pub mod row;
        pub mod source;
    }
}
