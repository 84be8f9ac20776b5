use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::core::freight::{estimate_freight, route_distance_km, toll_total, tolls_on_route};
use crate::core::normalize::{normalize_route, normalize_toll_plazas};
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Freight {
        vehicle,
        km,
        route,
        plazas,
    } = cmd
    {
        let core = Core::new(cfg)?;

        let route = match route {
            Some(location) => Some(normalize_route(&core.table(location)?)?),
            None => None,
        };

        let distance = match (km, &route) {
            (Some(km), _) => *km,
            (None, Some(points)) => route_distance_km(points),
            (None, None) => 0.0,
        };

        header(format!("Frete mínimo: {}", vehicle.label()));
        println!("Distância:     {distance:.1} km");
        println!("Tarifa:        R$ {:.2}/km", vehicle.rate_per_km());
        println!(
            "Frete mínimo:  R$ {:.2}\n",
            estimate_freight(distance, *vehicle)
        );

        let Some(points) = route else {
            return Ok(());
        };

        let plazas = match plazas {
            Some(location) => normalize_toll_plazas(&core.table(location)?)?,
            None => core.toll_plazas()?,
        };
        if plazas.is_empty() {
            warning("No toll plaza table configured (sources.toll_plazas).");
            return Ok(());
        }

        let crossed = tolls_on_route(&points, &plazas);
        if crossed.is_empty() {
            info("No toll plazas on this route.");
            return Ok(());
        }

        let mut table = Table::with_headers(&["Praça", "Rodovia", "Valor (leve)"]);
        for p in &crossed {
            table.add_row(vec![
                p.name.clone(),
                p.highway.clone(),
                format!("R$ {:.2}", p.light_fee),
            ]);
        }
        print!("{}", table.render());
        println!("\nPedágio total: R$ {:.2}", toll_total(&crossed));
    }
    Ok(())
}
