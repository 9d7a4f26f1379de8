/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::{BridgeNamePolicy, ResolverConfig, ResolverRuntimeConfig};

impl ResolverRuntimeConfig {
    pub fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match gns_yaml::normalize_key(k).as_str() {
            "dht_lookup_timeout" => {
                self.dht_lookup_timeout = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            "dns_lookup_timeout" => {
                self.dns_lookup_timeout = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            "dns_request_timeout" => {
                self.dns_request_timeout = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            "protective_query_timeout" | "query_timeout" => {
                self.protective_query_timeout = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            "graceful_stop_wait" => {
                self.graceful_stop_wait = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            "dht_replication_level" => {
                self.dht_replication_level = gns_yaml::value::as_u32(v)?;
                Ok(())
            }
            "max_background_queries" => {
                self.max_background_queries = gns_yaml::value::as_usize(v)?;
                Ok(())
            }
            "recursion_ceiling" | "max_recursion" => {
                self.recursion_ceiling = gns_yaml::value::as_u32(v)?;
                Ok(())
            }
            "disable_cache" => {
                self.disable_cache = gns_yaml::value::as_bool(v)?;
                Ok(())
            }
            "address_record_ttl" => {
                self.address_record_ttl = gns_yaml::humanize::as_duration(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }
}

impl ResolverConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for resolver should be 'map'"));
        };
        let mut config = ResolverConfig::default();
        gns_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
        config.check()?;
        Ok(config)
    }

    pub fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match gns_yaml::normalize_key(k).as_str() {
            "name" => {
                self.name = gns_yaml::value::as_string(v)?;
                Ok(())
            }
            "default_dns_servers" | "dns_servers" => {
                let servers = gns_yaml::value::as_list(v, gns_yaml::value::as_dns_server)
                    .context(format!("invalid dns server list value for key {k}"))?;
                for addr in servers {
                    self.add_default_dns_server(addr);
                }
                Ok(())
            }
            "pseudo_tlds" | "tlds" => {
                let Yaml::Hash(map) = v else {
                    return Err(anyhow!("invalid yaml value type for key {k}, expect map"));
                };
                gns_yaml::foreach_kv(map, |tld, v| {
                    let zone = gns_yaml::value::as_zone_key(v)?;
                    self.add_pseudo_tld(tld, zone);
                    Ok(())
                })
            }
            "critical_types" => {
                let types = gns_yaml::value::as_list(v, gns_yaml::value::as_record_type)
                    .context(format!("invalid record type list value for key {k}"))?;
                for t in types {
                    self.add_critical_type(t);
                }
                Ok(())
            }
            "bridge_name_policy" => {
                let s = gns_yaml::value::as_string(v)?;
                self.bridge_name_policy = BridgeNamePolicy::from_str(&s)?;
                Ok(())
            }
            "services" => {
                let Yaml::Hash(map) = v else {
                    return Err(anyhow!("invalid yaml value type for key {k}, expect map"));
                };
                gns_yaml::foreach_kv(map, |name, v| {
                    let port = gns_yaml::value::as_u16(v)?;
                    self.services.add_service(name, port);
                    Ok(())
                })
            }
            "protocols" => {
                let Yaml::Hash(map) = v else {
                    return Err(anyhow!("invalid yaml value type for key {k}, expect map"));
                };
                gns_yaml::foreach_kv(map, |name, v| {
                    let number = gns_yaml::value::as_u16(v)?;
                    self.services.add_protocol(name, number);
                    Ok(())
                })
            }
            "runtime" => {
                let Yaml::Hash(map) = v else {
                    return Err(anyhow!("invalid yaml value type for key {k}, expect map"));
                };
                gns_yaml::foreach_kv(map, |k, v| self.runtime.set_by_yaml_kv(k, v))
            }
            _ => self.runtime.set_by_yaml_kv(k, v),
        }
    }
}
