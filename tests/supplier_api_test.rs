// ==========================================
// 供应商目录 API 测试
// ==========================================
// 职责: 注册校验、列表筛选、供应商画像、供货合同、驾驶舱计数
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod supplier_api_test {
    use chrono::NaiveDate;
    use genco_feedstock::api::{ApiError, SupplierQuery};
    use genco_feedstock::app::seed_demo_data;
    use genco_feedstock::domain::contract::NewContract;
    use genco_feedstock::domain::supplier::{Coordinates, NewSupplier, SupplierLocation};
    use genco_feedstock::domain::types::{
        ComplianceStatus, ContractStatus, SupplierStatus, SupplierType,
    };
    use genco_feedstock::domain::QualityReading;

    use crate::test_helpers::{create_test_state, new_delivery, register_supplier};

    fn new_supplier(name: &str, email: &str, coordinates: Option<Coordinates>) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            supplier_type: SupplierType::Supplier,
            email: email.to_string(),
            phone: String::new(),
            location: SupplierLocation {
                address: "Jl. Industri No. 45, Bandung".to_string(),
                region: "West Java".to_string(),
                coordinates,
            },
        }
    }

    #[test]
    fn test_register_supplier_starts_pending() {
        let (_tmp, state) = create_test_state();
        let supplier = state
            .supplier_api
            .register_supplier(
                new_supplier("  CV. Harvest Indonesia ", "info@harvestindo.com", None),
                "admin",
            )
            .unwrap();

        assert_eq!(supplier.name, "CV. Harvest Indonesia");
        assert_eq!(supplier.status, SupplierStatus::Pending);
        assert_eq!(supplier.compliance_status, ComplianceStatus::Pending);

        let loaded = state.supplier_api.get_supplier(&supplier.supplier_id).unwrap();
        assert_eq!(loaded, supplier);

        let logs = state
            .dashboard_api
            .list_action_logs_by_target(&supplier.supplier_id)
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action_type, "REGISTER_SUPPLIER");
        assert_eq!(logs[0].actor, "admin");
    }

    #[test]
    fn test_register_supplier_validation() {
        let (_tmp, state) = create_test_state();
        let api = &state.supplier_api;

        let result = api.register_supplier(new_supplier(" ", "a@b.c", None), "admin");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        let result = api.register_supplier(new_supplier("Name", "no-at-sign", None), "admin");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        let result = api.register_supplier(
            new_supplier("Name", "a@b.c", Some(Coordinates { lat: 95.0, lng: 0.0 })),
            "admin",
        );
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        assert!(api.list_suppliers(&SupplierQuery::default()).unwrap().is_empty());
        assert!(matches!(api.get_supplier("missing"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_list_suppliers_filters() {
        let (_tmp, state) = create_test_state();
        seed_demo_data(&state).unwrap();
        let api = &state.supplier_api;

        let all = api.list_suppliers(&SupplierQuery::default()).unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["PT. Agro Lestari", "Santo Farmer Group", "CV. Harvest Indonesia"]
        );

        // 名称
        let query = SupplierQuery {
            search: Some("SANTO".to_string()),
            ..Default::default()
        };
        assert_eq!(api.list_suppliers(&query).unwrap().len(), 1);

        // 邮箱
        let query = SupplierQuery {
            search: Some("harvestindo".to_string()),
            ..Default::default()
        };
        let found = api.list_suppliers(&query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].supplier_id, "3");

        let query = SupplierQuery {
            supplier_type: Some(SupplierType::Farmer),
            ..Default::default()
        };
        assert_eq!(api.list_suppliers(&query).unwrap()[0].name, "Santo Farmer Group");

        let query = SupplierQuery {
            supplier_type: Some(SupplierType::Supplier),
            status: Some(SupplierStatus::Active),
            ..Default::default()
        };
        let found = api.list_suppliers(&query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "PT. Agro Lestari");
    }

    #[test]
    fn test_list_suppliers_search_non_ascii_name() {
        let (_tmp, state) = create_test_state();
        seed_demo_data(&state).unwrap();
        let registered = state
            .supplier_api
            .register_supplier(new_supplier("Ölmühle Bäuerin", "kontakt@oelmuehle.de", None), "admin")
            .unwrap();

        let hits = |term: &str| {
            state
                .supplier_api
                .list_suppliers(&SupplierQuery {
                    search: Some(term.to_string()),
                    ..Default::default()
                })
                .unwrap()
        };

        for term in ["ölmühle", "ÖLMÜHLE", "Ölmühle"] {
            let found = hits(term);
            assert_eq!(found.len(), 1, "检索词: {}", term);
            assert_eq!(found[0].supplier_id, registered.supplier_id);
        }
    }

    #[test]
    fn test_supplier_profile_statistics() {
        let (_tmp, state) = create_test_state();
        let supplier_id = register_supplier(&state, "PT. Agro Lestari", "a@agro.id", SupplierType::Supplier);
        let other_id = register_supplier(&state, "Santo Farmer Group", "s@coop.id", SupplierType::Farmer);

        let api = &state.delivery_api;
        let d1 = api
            .track_delivery(new_delivery(&supplier_id, "Jakarta", 100.0, QualityReading::new(0.0, 100.0, 0.0)), "u")
            .unwrap();
        api.track_delivery(new_delivery(&supplier_id, "Jakarta", 40.0, QualityReading::new(12.0, 94.0, 2.0)), "u")
            .unwrap();
        api.track_delivery(new_delivery(&other_id, "Bali", 70.0, QualityReading::new(1.0, 96.0, 0.2)), "u")
            .unwrap();
        api.approve_delivery(&d1.delivery_id, "s").unwrap();

        let profile = state.supplier_api.get_supplier_profile(&supplier_id).unwrap();
        assert_eq!(profile.supplier.supplier_id, supplier_id);
        assert_eq!(profile.delivery_count, 2);
        assert_eq!(profile.pending_count, 1);
        assert_eq!(profile.approved_volume_t, 100.0);
        assert_eq!(profile.total_volume_t, 140.0);
        // (100 + 75) / 2
        assert_eq!(profile.average_score, Some(87.5));

        let empty = register_supplier(&state, "New Farmer", "n@f.id", SupplierType::Farmer);
        let profile = state.supplier_api.get_supplier_profile(&empty).unwrap();
        assert_eq!(profile.delivery_count, 0);
        assert!(profile.average_score.is_none());
        assert_eq!(profile.active_contract_count, 0);
    }

    fn new_contract(supplier_id: &str, status: ContractStatus) -> NewContract {
        NewContract {
            supplier_id: supplier_id.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            terms: " Weekly delivery of 500 tons ".to_string(),
            volume_t: 13000.0,
            price: 830.0,
            status,
        }
    }

    #[test]
    fn test_profile_counts_active_contracts() {
        let (_tmp, state) = create_test_state();
        seed_demo_data(&state).unwrap();
        let api = &state.supplier_api;

        assert_eq!(api.get_supplier_profile("1").unwrap().active_contract_count, 1);
        assert_eq!(api.get_supplier_profile("2").unwrap().active_contract_count, 1);
        assert_eq!(api.get_supplier_profile("3").unwrap().active_contract_count, 0);

        let added = api
            .add_contract(new_contract("1", ContractStatus::Active), "admin")
            .unwrap();
        assert_eq!(added.terms, "Weekly delivery of 500 tons");
        api.add_contract(new_contract("1", ContractStatus::Expired), "admin")
            .unwrap();

        assert_eq!(api.get_supplier_profile("1").unwrap().active_contract_count, 2);

        let contracts = api.list_contracts("1").unwrap();
        assert_eq!(contracts.len(), 3);
        assert_eq!(contracts[0].contract_id, "c1");
        assert_eq!(contracts[1], added);

        let logs = state.dashboard_api.list_action_logs_by_target("1").unwrap();
        let registered: Vec<_> = logs
            .iter()
            .filter(|l| l.action_type == "REGISTER_CONTRACT")
            .collect();
        assert_eq!(registered.len(), 2);
        assert_eq!(
            registered[0].payload_json.as_ref().unwrap()["contract_id"],
            added.contract_id.as_str()
        );
    }

    #[test]
    fn test_add_contract_validation() {
        let (_tmp, state) = create_test_state();
        seed_demo_data(&state).unwrap();
        let api = &state.supplier_api;

        let result = api.add_contract(new_contract("missing", ContractStatus::Active), "admin");
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let mut input = new_contract("2", ContractStatus::Active);
        input.end_date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(matches!(api.add_contract(input, "admin"), Err(ApiError::InvalidInput(_))));

        let mut input = new_contract("2", ContractStatus::Active);
        input.terms = "  ".to_string();
        assert!(matches!(api.add_contract(input, "admin"), Err(ApiError::InvalidInput(_))));

        let mut input = new_contract("2", ContractStatus::Active);
        input.volume_t = 0.0;
        assert!(matches!(api.add_contract(input, "admin"), Err(ApiError::InvalidInput(_))));

        let mut input = new_contract("2", ContractStatus::Active);
        input.price = f64::NAN;
        assert!(matches!(api.add_contract(input, "admin"), Err(ApiError::InvalidInput(_))));

        assert_eq!(api.list_contracts("2").unwrap().len(), 1);
        assert!(matches!(api.list_contracts("missing"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_dashboard_stats_after_seed() {
        let (_tmp, state) = create_test_state();
        seed_demo_data(&state).unwrap();

        let stats = state.dashboard_api.get_dashboard_stats().unwrap();
        assert_eq!(stats.suppliers.total, 3);
        assert_eq!(stats.suppliers.suppliers, 2);
        assert_eq!(stats.suppliers.farmers, 1);
        assert_eq!(stats.suppliers.active, 2);
        assert_eq!(stats.suppliers.pending, 1);
        assert_eq!(stats.suppliers.inactive, 0);

        assert_eq!(stats.deliveries.total_count, 2);
        assert_eq!(stats.deliveries.approved_count, 1);
        assert_eq!(stats.deliveries.pending_count, 1);
        assert_eq!(stats.deliveries.total_volume_t, 11700.0);
        assert_eq!(stats.submitted_surveys, 0);

        assert!(matches!(
            state.dashboard_api.get_recent_actions(0),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
