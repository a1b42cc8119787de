pub mod get_stats_cmd;
